//! Cyfral Player - Playback
//!
//! The site's single audio session, platform-agnostic.
//!
//! This crate provides:
//! - The player core: one audio element, a reorderable queue, sequential and
//!   shuffle order, auto-advance and the 10-second "excursion" preview mode
//! - Timer-driven state machines for the player bar and seek hints
//! - Keyboard transport bindings
//! - A throttled audio level meter with a native FFT analyser
//! - A shared session handle for every view that shows the player
//!
//! # Architecture
//!
//! Platform code implements [`AudioElement`] (and optionally [`AudioGraph`]),
//! forwards element notifications to the session and calls
//! [`PlayerSession::tick`] once per frame. With the `wasm` feature the crate
//! ships that glue for browsers.
//!
//! # Example
//!
//! ```rust
//! use cyfral_core::Catalog;
//! use cyfral_playback::testing::{pump, FakeAudioElement};
//! use cyfral_playback::{AudioLevelMeter, ManualClock, PlayerConfig, PlayerSession};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let element = FakeAudioElement::new();
//! let session = PlayerSession::from_catalog(
//!     &catalog,
//!     Box::new(element.clone()),
//!     Box::new(ManualClock::new()),
//!     PlayerConfig::default(),
//!     AudioLevelMeter::unsupported(),
//! );
//!
//! session.play_item_by_id("dermo");
//! pump(&session, &element);
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.is_playing);
//! assert_eq!(snapshot.current.unwrap().id, "dermo");
//! ```

#![forbid(unsafe_code)]

pub mod analyser;
pub mod clock;
pub mod element;
pub mod error;
pub mod events;
pub mod excursion;
pub mod fft;
pub mod flash;
pub mod keyboard;
pub mod manager;
pub mod queue;
pub mod session;
pub mod shuffle;
pub mod testing;
pub mod types;
pub mod visibility;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use analyser::{AudioGraph, AudioLevelMeter, FrequencyAnalyser};
pub use clock::{Clock, ManualClock, SystemClock};
pub use element::{AudioElement, ElementEvent};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use fft::{FftAnalyser, NativeAudioGraph, SampleTap};
pub use keyboard::{resolve_key, FocusTarget, KeyContext, KeyOutcome, KeyPress, TransportAction};
pub use manager::PlayerCore;
pub use queue::Queue;
pub use session::PlayerSession;
pub use types::{
    AnalyserConfig, MoveDirection, PlaybackOrder, PlayerConfig, PlayerSnapshot, PlayerVisibility,
    SeekFlash,
};
