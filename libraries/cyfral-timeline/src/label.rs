//! Crossfading "now performing" label
//!
//! When the current segment's artist changes, the label fades for a short
//! crossfade. During the fade it shows the live segment; at the deadline the
//! incoming artist becomes the displayed one. A fade in flight is never
//! restarted, further changes are picked up once it completes.

use crate::layout::segment_for_artist;
use cyfral_core::TrackSegment;
use serde::Serialize;
use std::time::Duration;

/// What the label shows this frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelView {
    pub artist: String,
    pub color: String,

    /// Label is mid-crossfade
    pub fading: bool,
}

#[derive(Debug, Clone)]
struct Transition {
    target: String,
    deadline: Duration,
}

/// Artist label state machine
#[derive(Debug, Clone)]
pub struct ArtistLabel {
    crossfade: Duration,
    displayed: Option<String>,
    transition: Option<Transition>,
}

impl ArtistLabel {
    pub fn new(crossfade: Duration) -> Self {
        Self {
            crossfade,
            displayed: None,
            transition: None,
        }
    }

    /// New segment list: show its first artist without a fade
    pub fn reset(&mut self, segments: &[TrackSegment]) {
        self.displayed = segments.first().map(|s| s.artist.clone());
        self.transition = None;
    }

    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn is_fading(&self) -> bool {
        self.transition.is_some()
    }

    /// Finish a crossfade whose deadline has passed
    pub fn tick(&mut self, now: Duration) {
        if self.transition.as_ref().is_some_and(|t| now >= t.deadline) {
            if let Some(done) = self.transition.take() {
                self.displayed = Some(done.target);
            }
        }
    }

    /// Feed the segment playing now and get the label to render
    pub fn observe(
        &mut self,
        segments: &[TrackSegment],
        current: Option<&TrackSegment>,
        now: Duration,
    ) -> Option<LabelView> {
        self.tick(now);

        let current = current?;
        if self.transition.is_none() && self.displayed.as_deref() != Some(current.artist.as_str()) {
            self.transition = Some(Transition {
                target: current.artist.clone(),
                deadline: now + self.crossfade,
            });
        }

        if self.transition.is_some() {
            return Some(LabelView {
                artist: current.artist.clone(),
                color: current.color.clone(),
                fading: true,
            });
        }

        let artist = self.displayed.clone().unwrap_or_else(|| current.artist.clone());
        let color = segment_for_artist(segments, &artist)
            .map_or_else(|| current.color.clone(), |s| s.color.clone());
        Some(LabelView {
            artist,
            color,
            fading: false,
        })
    }
}
