//! Display helpers: clock strings and colour gradients

use crate::layout::SegmentLayout;
use crate::parser::DEFAULT_COLOR;
use std::fmt::Write;

/// Alpha of the segment tint behind the player's progress bar
pub const SEGMENT_TINT_ALPHA: f64 = 0.22;

/// Alpha of the fainter tint on catalog cards
pub const INLINE_TINT_ALPHA: f64 = 0.16;

/// Format seconds as `M:SS`
///
/// Negative or non-finite input shows `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Convert `#rgb`/`#rrggbb` into a CSS `rgba()` colour
///
/// Malformed input renders as the default gray.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = parse_rgb(hex)
        .or_else(|| parse_rgb(DEFAULT_COLOR))
        .unwrap_or((102, 102, 102));
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// Horizontal CSS gradient with one hard-edged band per segment
pub fn segments_gradient(layout: &[SegmentLayout<'_>], alpha: f64) -> String {
    let mut css = String::from("linear-gradient(90deg");
    for band in layout {
        let color = hex_to_rgba(&band.segment.color, alpha);
        let _ = write!(
            css,
            ", {color} {}%, {color} {}%",
            band.start_pct, band.end_pct
        );
    }
    css.push(')');
    css
}
