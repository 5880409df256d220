//! Core types for the player

use crate::error::Result;
use cyfral_core::PlaylistItem;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What "advance to next" means
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackOrder {
    /// Queue order, stop at the end
    #[default]
    Sequential,
    /// Random item other than the current one
    Shuffle,
}

/// Compact player bar lifecycle
///
/// `Hidden -> Entering -> Visible -> Exiting -> Hidden`; the entering and
/// exiting states end on fixed timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerVisibility {
    #[default]
    Hidden,
    Entering,
    Visible,
    Exiting,
}

/// Direction of a single-step queue move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    /// Index of the neighbour in this direction
    pub fn target(self, index: usize) -> Option<usize> {
        match self {
            Self::Up => index.checked_sub(1),
            Self::Down => index.checked_add(1),
        }
    }
}

/// Transient hint shown after a keyboard seek
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekFlash {
    /// Monotonic id, a newer flash supersedes older ones
    pub id: u64,
    pub delta_sec: f64,
}

impl SeekFlash {
    /// Text shown to the user, e.g. `+5 сек`
    pub fn label(&self) -> String {
        let sign = if self.delta_sec > 0.0 { "+" } else { "-" };
        format!("{sign}{} сек", self.delta_sec.abs())
    }
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Length of an excursion preview
    pub excursion_window_secs: f64,

    /// Tracks longer than this get a random preview start
    pub excursion_long_track_secs: f64,

    /// Random starts keep this much room before the end of the track
    pub excursion_start_margin_secs: f64,

    /// Minimum interval between progress notifications
    pub progress_throttle_ms: u64,

    /// Relative seeks closer together than this are dropped
    pub seek_throttle_ms: u64,

    /// How long a seek flash stays visible
    pub seek_flash_ms: u64,

    /// Enter animation of the compact bar
    pub enter_transition_ms: u64,

    /// Exit animation of the compact bar
    pub exit_transition_ms: u64,

    /// `prev()` restarts the current item when further in than this
    pub prev_restart_secs: f64,

    /// Arrow key seek step
    pub keyboard_seek_secs: f64,

    pub order: PlaybackOrder,
    pub auto_advance: bool,
    pub excursion: bool,

    /// Fixed RNG seed, `None` seeds from the OS
    pub rng_seed: Option<u64>,

    pub analyser: AnalyserConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            excursion_window_secs: 10.0,
            excursion_long_track_secs: 10.5,
            excursion_start_margin_secs: 10.1,
            progress_throttle_ms: 100,
            seek_throttle_ms: 30,
            seek_flash_ms: 650,
            enter_transition_ms: 2500,
            exit_transition_ms: 600,
            prev_restart_secs: 3.0,
            keyboard_seek_secs: 5.0,
            order: PlaybackOrder::Sequential,
            auto_advance: true,
            excursion: false,
            rng_seed: None,
            analyser: AnalyserConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Parse from TOML, missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn progress_throttle(&self) -> Duration {
        Duration::from_millis(self.progress_throttle_ms)
    }

    pub fn seek_throttle(&self) -> Duration {
        Duration::from_millis(self.seek_throttle_ms)
    }
}

/// Frequency analyser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// FFT window, a power of two; half of it is the bin count
    pub fft_size: usize,

    /// Weight of the previous frame, `0.0..=1.0`
    pub smoothing: f32,

    /// Lowest bins averaged into the level
    pub level_bins: usize,

    /// Minimum interval between samples (~30 fps)
    pub frame_interval_ms: u64,

    /// dB mapped to byte 0
    pub min_decibels: f32,

    /// dB mapped to byte 255
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            level_bins: 32,
            frame_interval_ms: 33,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Read-only view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub current: Option<PlaylistItem>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,

    /// `0..=100`, 0 while the duration is unknown
    pub progress: f64,

    pub seek_flash: Option<SeekFlash>,
    pub order: PlaybackOrder,
    pub excursion_on: bool,

    /// Whole seconds left in the excursion window
    pub excursion_remaining: Option<u32>,

    pub auto_advance: bool,
    pub queue: Vec<PlaylistItem>,
    pub visibility: PlayerVisibility,
    pub show_queue: bool,
    pub is_fullscreen: bool,

    /// `0.0..=1.0`
    pub audio_level: f32,
}
