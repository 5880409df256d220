//! Cyfral Player - Track Timelines
//!
//! Colour-coded artist sections for tracks with several performers.
//!
//! This crate provides:
//! - Timing file parsing (`M:SS - Artist - COLOR` lines)
//! - A memoized, request-deduplicating segment loader
//! - An HTTP timing source
//! - Progress bar geometry: segment percentages, current/hovered segment,
//!   and the crossfading "now performing" artist label
//!
//! Every failure on the load path degrades to "no segments": a track without a
//! timings file simply renders a plain progress bar.
//!
//! # Example
//!
//! ```rust
//! use cyfral_timeline::{layout_segments, parse_timings, segment_at_time};
//!
//! let segments = parse_timings("0:30 - RJK - RED\n0:00 - LIL CYFRAL - GREEN\n");
//! assert_eq!(segments[0].artist, "LIL CYFRAL");
//!
//! let current = segment_at_time(&segments, 42.0).unwrap();
//! assert_eq!(current.artist, "RJK");
//!
//! let layout = layout_segments(&segments, 60.0, 8.0);
//! assert_eq!(layout[1].start_pct, 50.0);
//! ```

mod config;
mod error;
mod format;
mod label;
mod layout;
mod loader;
mod parser;
mod progress;
mod source;

pub use config::TimelineConfig;
pub use error::{Result, TimelineError};
pub use format::{
    format_time, hex_to_rgba, segments_gradient, INLINE_TINT_ALPHA, SEGMENT_TINT_ALPHA,
};
pub use label::{ArtistLabel, LabelView};
pub use layout::{
    effective_duration, layout_segments, pointer_percent, segment_at_percent, segment_at_time,
    segment_for_artist, SegmentLayout, TimelineHover,
};
pub use loader::{SegmentLoader, SegmentLookup, Segments};
pub use parser::{color_hex, parse_time_to_seconds, parse_timings, DEFAULT_COLOR};
pub use progress::{item_gradient, ProgressFrame, SegmentBand, SegmentedProgress};
pub use source::{HttpTimingSource, TimingSource};
