//! Browser implementations of the platform seams

use crate::analyser::{AudioGraph, FrequencyAnalyser};
use crate::clock::Clock;
use crate::element::AudioElement;
use crate::error::{PlaybackError, Result};
use crate::types::AnalyserConfig;
use cyfral_core::{CyfralError, RecordStore};
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AnalyserNode, AudioContext, HtmlAudioElement, Performance, Storage};

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// `HTMLAudioElement` as the player's audio element
#[derive(Clone)]
pub struct WebAudioElement {
    audio: HtmlAudioElement,
}

impl WebAudioElement {
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }
}

impl AudioElement for WebAudioElement {
    fn set_source(&mut self, src: &str) {
        self.audio.set_src(src);
    }

    fn has_source(&self) -> bool {
        !self.audio.src().is_empty()
    }

    fn load(&mut self) {
        self.audio.load();
    }

    fn play(&mut self) -> Result<()> {
        let promise = self
            .audio
            .play()
            .map_err(|e| PlaybackError::PlayRejected(js_error(&e)))?;

        // autoplay rejections arrive later; the element stays paused
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                debug!(error = %js_error(&e), "Play promise rejected");
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            debug!(error = %js_error(&e), "Pause failed");
        }
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&mut self, secs: f64) {
        self.audio.set_current_time(secs);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.audio.duration();
        (!duration.is_nan()).then_some(duration)
    }
}

/// `performance.now()` clock
#[derive(Clone)]
pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    pub fn new() -> Result<Self> {
        let performance = web_sys::window()
            .and_then(|w| w.performance())
            .ok_or_else(|| PlaybackError::AudioElement("performance API unavailable".into()))?;
        Ok(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(self.performance.now().max(0.0) / 1000.0)
    }
}

/// Web Audio graph: element -> analyser -> speakers
pub struct WebAudioGraph {
    audio: HtmlAudioElement,
}

impl WebAudioGraph {
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }
}

struct WebAnalyser {
    node: AnalyserNode,
    _context: AudioContext,
}

impl FrequencyAnalyser for WebAnalyser {
    fn frequency_bin_count(&self) -> usize {
        self.node.frequency_bin_count() as usize
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.node.get_byte_frequency_data(out);
    }
}

impl AudioGraph for WebAudioGraph {
    fn connect(&mut self, config: &AnalyserConfig) -> Result<Box<dyn FrequencyAnalyser>> {
        let unavailable = |e: JsValue| PlaybackError::AnalyserUnavailable(js_error(&e));

        let context = AudioContext::new().map_err(unavailable)?;
        let node = context.create_analyser().map_err(unavailable)?;
        node.set_fft_size(config.fft_size as u32);
        node.set_smoothing_time_constant(f64::from(config.smoothing));
        node.set_min_decibels(f64::from(config.min_decibels));
        node.set_max_decibels(f64::from(config.max_decibels));

        let source = context
            .create_media_element_source(&self.audio)
            .map_err(unavailable)?;
        source.connect_with_audio_node(&node).map_err(unavailable)?;
        node.connect_with_audio_node(&context.destination())
            .map_err(unavailable)?;

        if let Ok(promise) = context.resume() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }

        Ok(Box::new(WebAnalyser {
            node,
            _context: context,
        }))
    }
}

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new() -> cyfral_core::Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| CyfralError::storage("no window"))?
            .local_storage()
            .map_err(|e| CyfralError::storage(js_error(&e)))?
            .ok_or_else(|| CyfralError::storage("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl RecordStore for LocalStorageStore {
    fn get(&self, key: &str) -> cyfral_core::Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| CyfralError::storage(js_error(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> cyfral_core::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CyfralError::storage(js_error(&e)))
    }
}
