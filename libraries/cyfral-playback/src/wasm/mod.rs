//! WASM bindings for cyfral-playback
//!
//! Drives a browser `HTMLAudioElement` with the player core, feeds the
//! segmented progress bar, and exposes a JavaScript-friendly API.

#[cfg(feature = "wasm")]
pub mod element;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub use element::{LocalStorageStore, PerformanceClock, WebAudioElement, WebAudioGraph};

#[cfg(feature = "wasm")]
pub use player::WasmPlayer;
