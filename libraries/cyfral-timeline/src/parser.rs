//! Timing file parsing
//!
//! A timings file is plain text, one segment per line:
//!
//! ```text
//! 0:00 - LIL CYFRAL - GREEN
//! 1:12 - RJK - RED
//! ```
//!
//! Lines that do not have at least three ` - ` separated fields are skipped.

use cyfral_core::TrackSegment;

/// Colour used for unknown colour names
pub const DEFAULT_COLOR: &str = "#666666";

const COLOR_TABLE: &[(&str, &str)] = &[
    ("GRAY", "#666666"),
    ("RED", "#ff0033"),
    ("GREEN", "#00ff41"),
    ("DARK_GREEN", "#008822"),
    ("YELLOW", "#ffcc00"),
    ("LIGHT_BLUE", "#00ccff"),
    ("BLUE", "#0066ff"),
    ("WHITE", "#ffffff"),
    ("PINK", "#ff00ff"),
    ("ORANGE", "#ff6600"),
    ("PURPLE", "#9933ff"),
    ("BLACK", "#333333"),
];

/// Map a colour name to its hex value
///
/// Matching is case-insensitive; anything unknown is gray.
pub fn color_hex(name: &str) -> &'static str {
    let name = name.trim();
    COLOR_TABLE
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map_or(DEFAULT_COLOR, |(_, hex)| hex)
}

/// Parse `M:SS` into seconds
///
/// Anything other than exactly two colon-separated numeric parts is 0.
pub fn parse_time_to_seconds(text: &str) -> f64 {
    let mut parts = text.trim().split(':');
    let (Some(mins), Some(secs), None) = (parts.next(), parts.next(), parts.next()) else {
        return 0.0;
    };

    match (mins.trim().parse::<f64>(), secs.trim().parse::<f64>()) {
        (Ok(m), Ok(s)) if m.is_finite() && s.is_finite() => m * 60.0 + s,
        _ => 0.0,
    }
}

/// Parse a timings file into segments sorted by start time
///
/// Segments with equal start times keep their file order.
pub fn parse_timings(text: &str) -> Vec<TrackSegment> {
    let mut segments: Vec<TrackSegment> = text
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }

            let fields: Vec<&str> = line.split(" - ").map(str::trim).collect();
            if fields.len() < 3 {
                return None;
            }

            Some(TrackSegment::new(
                parse_time_to_seconds(fields[0]),
                fields[1],
                color_hex(fields[2]),
            ))
        })
        .collect();

    segments.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
    segments
}
