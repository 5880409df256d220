//! Audio element abstraction
//!
//! The player owns exactly one element. Platforms implement [`AudioElement`]
//! (a browser `HTMLAudioElement`, a native decoder, a test fake) and forward
//! the element's notifications to the player as [`ElementEvent`]s.

use crate::error::Result;

/// One playable media element
pub trait AudioElement {
    /// Point the element at a new source; takes effect on `load`
    fn set_source(&mut self, src: &str);

    /// Whether a source has been assigned
    fn has_source(&self) -> bool;

    /// Reset the element and begin loading the current source
    fn load(&mut self);

    /// Request playback
    ///
    /// An asynchronous rejection (autoplay policy) is reported by the element
    /// as a `Pause` event, not through this result.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    /// Media duration, `None` until metadata has loaded
    fn duration(&self) -> Option<f64>;
}

/// Notifications from the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEvent {
    Play,
    Pause,
    LoadedMetadata,
    TimeUpdate,
    Ended,
}

/// Known duration, filtering out the NaN/infinite values media elements report
pub(crate) fn known_duration(element: &dyn AudioElement) -> Option<f64> {
    element
        .duration()
        .filter(|d| d.is_finite() && *d > 0.0)
}
