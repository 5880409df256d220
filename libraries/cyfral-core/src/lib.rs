//! Cyfral Player Core
//!
//! Platform-agnostic domain types, the built-in catalog and the tiny amount of
//! persisted state the site keeps.
//!
//! This crate provides the foundational building blocks used by the timeline
//! and playback libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `PlaylistItem`, `ItemKind`, `TrackSegment`
//! - **Catalog**: `Track`, `Demo`, `Catalog` and the master playlist builder
//! - **Storage**: `RecordStore` and the `BestRecord` easter-egg score
//! - **Error Handling**: Unified `CyfralError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cyfral_core::{Catalog, ItemKind};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let playlist = catalog.build_playlist();
//!
//! assert_eq!(playlist[0].kind, ItemKind::Podcast);
//! assert_eq!(playlist.len(), 1 + catalog.tracks.len() + catalog.demos.len());
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, Demo, ExternalLinks, Podcast, Track};
pub use error::{CyfralError, Result};
pub use storage::{BestRecord, FileRecordStore, MemoryRecordStore, RecordStore, BEST_RECORD_KEY};
pub use types::{ItemKind, PlaylistItem, TrackSegment};
