//! Domain types shared by the timeline and playback libraries

mod item;
mod segment;

pub use item::{ItemKind, PlaylistItem};
pub use segment::TrackSegment;
