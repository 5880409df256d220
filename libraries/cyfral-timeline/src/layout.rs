//! Segment geometry on the progress bar
//!
//! The bar spans `max(duration, last.start + tail_pad)` seconds so the last
//! segment stays visible while the real duration is still unknown.

use cyfral_core::TrackSegment;

/// A segment placed on the bar, all values in percent of the bar width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLayout<'a> {
    pub segment: &'a TrackSegment,
    pub start_pct: f64,
    pub end_pct: f64,
    pub width_pct: f64,
    pub mid_pct: f64,
}

/// Duration to lay out against: the reported one, or `assumed` when unknown
pub fn effective_duration(duration: f64, assumed: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        assumed
    }
}

/// Place sorted segments on the bar
pub fn layout_segments(
    segments: &[TrackSegment],
    duration: f64,
    tail_pad: f64,
) -> Vec<SegmentLayout<'_>> {
    let Some(last) = segments.last() else {
        return Vec::new();
    };

    let total = duration.max(last.start_sec + tail_pad);
    if total <= 0.0 {
        return Vec::new();
    }

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let start = segment.start_sec;
            let end = segments.get(i + 1).map_or(total, |next| next.start_sec);
            let start_pct = start / total * 100.0;
            let end_pct = end / total * 100.0;
            SegmentLayout {
                segment,
                start_pct,
                end_pct,
                width_pct: end_pct - start_pct,
                mid_pct: (start_pct + end_pct) / 2.0,
            }
        })
        .collect()
}

/// Segment playing at `time_sec`
///
/// Before the first segment starts this still answers the first segment.
pub fn segment_at_time(segments: &[TrackSegment], time_sec: f64) -> Option<&TrackSegment> {
    segments
        .iter()
        .rev()
        .find(|s| s.start_sec <= time_sec)
        .or_else(|| segments.first())
}

/// Segment under a horizontal position given in percent
///
/// Falls back to the last segment when nothing covers `pct`.
pub fn segment_at_percent<'l, 'a>(
    layout: &'l [SegmentLayout<'a>],
    pct: f64,
) -> Option<&'l SegmentLayout<'a>> {
    layout
        .iter()
        .find(|l| l.start_pct <= pct && pct <= l.end_pct)
        .or_else(|| layout.last())
}

/// Pointer position relative to the bar, clamped to `0..=100`
pub fn pointer_percent(pointer_x: f64, bar_left: f64, bar_width: f64) -> Option<f64> {
    if bar_width.is_nan() || bar_width <= 0.0 || !pointer_x.is_finite() {
        return None;
    }
    Some(((pointer_x - bar_left) / bar_width * 100.0).clamp(0.0, 100.0))
}

/// First segment credited to `artist`
pub fn segment_for_artist<'a>(segments: &'a [TrackSegment], artist: &str) -> Option<&'a TrackSegment> {
    segments.iter().find(|s| s.artist == artist)
}

/// Hovered segment under the pointer
///
/// Moving within one segment changes nothing. Crossing into another segment
/// of the same artist keeps the artist but moves the tooltip anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineHover {
    hovered: Option<HoveredSegment>,
}

#[derive(Debug, Clone, PartialEq)]
struct HoveredSegment {
    artist: String,
    color: String,
    mid_pct: f64,
}

impl TimelineHover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the pointer at `pct`; returns true when the artist or anchor changed
    pub fn update(&mut self, layout: &[SegmentLayout<'_>], pct: f64) -> bool {
        let Some(target) = segment_at_percent(layout, pct) else {
            return self.clear();
        };

        let next = HoveredSegment {
            artist: target.segment.artist.clone(),
            color: target.segment.color.clone(),
            mid_pct: target.mid_pct,
        };
        if self.hovered.as_ref() == Some(&next) {
            return false;
        }

        self.hovered = Some(next);
        true
    }

    /// Pointer left the bar; returns true if something was hovered
    pub fn clear(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    pub fn artist(&self) -> Option<&str> {
        self.hovered.as_ref().map(|h| h.artist.as_str())
    }

    pub fn color(&self) -> Option<&str> {
        self.hovered.as_ref().map(|h| h.color.as_str())
    }

    /// Tooltip anchor, in percent of the bar width
    pub fn anchor_pct(&self) -> Option<f64> {
        self.hovered.as_ref().map(|h| h.mid_pct)
    }
}
