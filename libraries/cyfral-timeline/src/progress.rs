//! Segmented progress bar model shared by the compact bar and fullscreen view

use crate::config::TimelineConfig;
use crate::format::{hex_to_rgba, segments_gradient, SEGMENT_TINT_ALPHA};
use crate::label::{ArtistLabel, LabelView};
use crate::layout::{effective_duration, layout_segments, segment_at_time, TimelineHover};
use crate::loader::Segments;
use cyfral_core::TrackSegment;
use serde::Serialize;
use std::time::Duration;

/// One coloured band of the bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentBand {
    pub artist: String,
    pub color: String,
    pub tint: String,
    pub start_pct: f64,
    pub end_pct: f64,
    pub width_pct: f64,
    pub mid_pct: f64,
    pub is_current: bool,
    pub is_hovered: bool,
}

/// Everything needed to draw the bar for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFrame {
    pub bands: Vec<SegmentBand>,
    pub gradient: String,
    pub current: Option<usize>,
    pub label: Option<LabelView>,

    /// Played fraction of the reported duration, in percent
    pub played_pct: f64,
}

/// Progress bar state for the current item
pub struct SegmentedProgress {
    config: TimelineConfig,
    segments: Option<Segments>,
    label: ArtistLabel,
    hover: TimelineHover,
}

impl SegmentedProgress {
    pub fn new(config: TimelineConfig) -> Self {
        let crossfade = Duration::from_millis(config.label_crossfade_ms);
        Self {
            config,
            segments: None,
            label: ArtistLabel::new(crossfade),
            hover: TimelineHover::new(),
        }
    }

    /// Swap in the segments of a newly loaded item (`None` for a plain bar)
    pub fn set_segments(&mut self, segments: Option<Segments>) {
        let unchanged = match (&self.segments, &segments) {
            (Some(a), Some(b)) => std::sync::Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.label.reset(segments.as_deref().unwrap_or_default());
        self.hover.clear();
        self.segments = segments;
    }

    pub fn segments(&self) -> Option<&Segments> {
        self.segments.as_ref()
    }

    pub fn hover(&self) -> &TimelineHover {
        &self.hover
    }

    /// Pointer moved to `pct` of the bar; returns true when the tooltip changes
    pub fn hover_at(&mut self, pct: f64, duration: f64) -> bool {
        let Some(segments) = self.segments.clone() else {
            return false;
        };
        let total = effective_duration(duration, self.config.assumed_duration_secs);
        let layout = layout_segments(&segments, total, self.config.tail_pad_secs);
        self.hover.update(&layout, pct)
    }

    pub fn clear_hover(&mut self) -> bool {
        self.hover.clear()
    }

    /// Compute the frame for the given playback position
    pub fn frame(&mut self, now: Duration, current_time: f64, duration: f64) -> ProgressFrame {
        let played_pct = if duration.is_finite() && duration > 0.0 {
            (current_time / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        let Some(segments) = self.segments.clone() else {
            return ProgressFrame {
                bands: Vec::new(),
                gradient: String::new(),
                current: None,
                label: None,
                played_pct,
            };
        };

        let total = effective_duration(duration, self.config.assumed_duration_secs);
        let layout = layout_segments(&segments, total, self.config.tail_pad_secs);
        let current_segment = segment_at_time(&segments, current_time);
        let current = current_segment.and_then(|c| segments.iter().position(|s| std::ptr::eq(s, c)));
        let hovered_artist = self.hover.artist();

        let bands = layout
            .iter()
            .enumerate()
            .map(|(i, l)| SegmentBand {
                artist: l.segment.artist.clone(),
                color: l.segment.color.clone(),
                tint: hex_to_rgba(&l.segment.color, SEGMENT_TINT_ALPHA),
                start_pct: l.start_pct,
                end_pct: l.end_pct,
                width_pct: l.width_pct,
                mid_pct: l.mid_pct,
                is_current: current == Some(i),
                is_hovered: hovered_artist == Some(l.segment.artist.as_str()),
            })
            .collect();
        let gradient = segments_gradient(&layout, SEGMENT_TINT_ALPHA);
        let label = self.label.observe(&segments, current_segment, now);

        ProgressFrame {
            bands,
            gradient,
            current,
            label,
            played_pct,
        }
    }
}

/// Gradient for an item shown outside the player (a catalog card)
///
/// `duration` may be unknown (NaN or 0); the assumed duration is used then.
pub fn item_gradient(
    segments: &[TrackSegment],
    duration: f64,
    config: &TimelineConfig,
    alpha: f64,
) -> String {
    let total = effective_duration(duration, config.assumed_duration_secs);
    let layout = layout_segments(segments, total, config.tail_pad_secs);
    segments_gradient(&layout, alpha)
}
