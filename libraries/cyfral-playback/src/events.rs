//! Player events
//!
//! The core queues an event at every observable change. Adapters drain the
//! queue after each call and forward the events to the UI.

use crate::types::{PlaybackOrder, PlayerVisibility, SeekFlash};
use serde::{Deserialize, Serialize};

/// Events emitted by the player core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Element started or stopped playing
    StateChanged { is_playing: bool },

    /// A new item was loaded into the element
    TrackChanged {
        item_id: String,
        index: usize,
        previous_item_id: Option<String>,
    },

    /// Queue order changed
    QueueChanged,

    /// Throttled position update
    Progress {
        current_time: f64,
        duration: Option<f64>,
        progress: f64,
    },

    /// Duration became known
    DurationChanged { duration: Option<f64> },

    VisibilityChanged { visibility: PlayerVisibility },

    OrderChanged { order: PlaybackOrder },

    ExcursionChanged { on: bool },

    /// Seconds left in the excursion window changed
    ExcursionRemaining { remaining: Option<u32> },

    /// Excursion window ran out and the player moved on
    ExcursionAdvanced { from_item_id: String },

    SeekFlashShown { flash: SeekFlash },

    SeekFlashCleared,

    ShowQueueChanged { show: bool },

    FullscreenChanged { open: bool },

    AutoAdvanceChanged { on: bool },

    /// Audio level for the visualizer
    AudioLevel { level: f32 },
}
