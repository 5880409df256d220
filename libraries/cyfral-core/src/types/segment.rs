//! Artist segments of a track timeline
use serde::{Deserialize, Serialize};

/// One contributing artist's section of a track
///
/// A sorted list of segments partitions the timeline: each segment owns
/// `[start_sec, next.start_sec)`, the last one runs to the end of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSegment {
    /// Offset from the start of the track, in seconds
    pub start_sec: f64,

    /// Artist performing this section
    pub artist: String,

    /// Display colour as `#rrggbb`
    pub color: String,
}

impl TrackSegment {
    /// Create a new segment
    pub fn new(start_sec: f64, artist: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            start_sec,
            artist: artist.into(),
            color: color.into(),
        }
    }
}
