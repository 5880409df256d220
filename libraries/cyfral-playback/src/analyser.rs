//! Audio level meter for the visualizer
//!
//! Lazily wires the element into a frequency analyser the first time the
//! level is needed, then samples it at a fixed frame interval. The level is
//! only computed while audio is playing and a view that shows it is open;
//! otherwise it reads 0. If the graph cannot be built the meter stays at 0
//! for the rest of the session.

use crate::error::Result;
use crate::types::AnalyserConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of byte-scaled frequency magnitudes, like a Web Audio `AnalyserNode`
pub trait FrequencyAnalyser {
    /// Number of frequency bins (half the FFT size)
    fn frequency_bin_count(&self) -> usize;

    /// Fill `out` with the current magnitudes, `0..=255` per bin
    fn byte_frequency_data(&mut self, out: &mut [u8]);
}

/// Builds the analysis graph around the audio element
pub trait AudioGraph {
    /// Connect element -> analyser -> output; called at most once
    fn connect(&mut self, config: &AnalyserConfig) -> Result<Box<dyn FrequencyAnalyser>>;
}

enum GraphState {
    Unbuilt(Box<dyn AudioGraph>),
    Connected(Box<dyn FrequencyAnalyser>),
    Unsupported,
}

/// Throttled 0-1 loudness signal
pub struct AudioLevelMeter {
    state: GraphState,
    config: AnalyserConfig,
    last_sample: Option<Duration>,
    level: f32,
    scratch: Vec<u8>,
}

impl AudioLevelMeter {
    /// Create a meter; `None` means the platform has no analysis support
    pub fn new(graph: Option<Box<dyn AudioGraph>>, config: AnalyserConfig) -> Self {
        let state = match graph {
            Some(graph) => GraphState::Unbuilt(graph),
            None => GraphState::Unsupported,
        };

        Self {
            state,
            config,
            last_sample: None,
            level: 0.0,
            scratch: Vec::new(),
        }
    }

    /// Meter without an analysis graph, always 0
    pub fn unsupported() -> Self {
        Self::new(None, AnalyserConfig::default())
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, GraphState::Connected(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.state, GraphState::Unsupported)
    }

    /// Advance the meter to `now` and return the current level
    pub fn update(&mut self, now: Duration, is_playing: bool, view_open: bool) -> f32 {
        if !(is_playing && view_open) {
            self.level = 0.0;
            self.last_sample = None;
            return 0.0;
        }

        self.ensure_connected();
        let GraphState::Connected(analyser) = &mut self.state else {
            self.level = 0.0;
            return 0.0;
        };

        if self
            .last_sample
            .is_some_and(|last| now.saturating_sub(last) < self.config.frame_interval())
        {
            return self.level;
        }
        self.last_sample = Some(now);

        let count = analyser.frequency_bin_count();
        self.scratch.resize(count, 0);
        analyser.byte_frequency_data(&mut self.scratch);

        let bins = count.min(self.config.level_bins);
        self.level = if bins == 0 {
            0.0
        } else {
            let sum: u32 = self.scratch[..bins].iter().map(|&b| u32::from(b)).sum();
            sum as f32 / bins as f32 / 255.0
        };
        self.level
    }

    fn ensure_connected(&mut self) {
        if !matches!(self.state, GraphState::Unbuilt(_)) {
            return;
        }

        let GraphState::Unbuilt(mut graph) =
            std::mem::replace(&mut self.state, GraphState::Unsupported)
        else {
            return;
        };

        match graph.connect(&self.config) {
            Ok(analyser) => {
                debug!(bins = analyser.frequency_bin_count(), "Audio analyser connected");
                self.state = GraphState::Connected(analyser);
            }
            Err(e) => {
                warn!(error = %e, "Audio analysis not supported, visualizer disabled");
            }
        }
    }
}
