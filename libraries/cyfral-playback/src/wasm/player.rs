//! WASM player: session, audio element listeners and segment loading

use super::element::{LocalStorageStore, PerformanceClock, WebAudioElement, WebAudioGraph};
use super::types::{parse_direction, parse_order, KeyHandled, SegmentsLoaded};
use crate::analyser::AudioLevelMeter;
use crate::clock::Clock;
use crate::element::ElementEvent;
use crate::events::PlayerEvent;
use crate::keyboard::{FocusTarget, KeyPress};
use crate::session::PlayerSession;
use crate::types::PlayerConfig;
use cyfral_core::{BestRecord, Catalog};
use cyfral_timeline::{
    item_gradient, HttpTimingSource, SegmentLoader, SegmentLookup, SegmentedProgress,
    TimelineConfig, INLINE_TINT_ALPHA,
};
use js_sys::{Function, Promise};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAudioElement, HtmlElement, KeyboardEvent};

fn to_js<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

const ELEMENT_EVENTS: [(&str, ElementEvent); 5] = [
    ("play", ElementEvent::Play),
    ("pause", ElementEvent::Pause),
    ("loadedmetadata", ElementEvent::LoadedMetadata),
    ("timeupdate", ElementEvent::TimeUpdate),
    ("ended", ElementEvent::Ended),
];

/// State shared between the exported player and its DOM listeners
struct Bridge {
    session: PlayerSession,
    clock: PerformanceClock,
    loader: SegmentLoader,
    timeline: TimelineConfig,
    progress: RefCell<SegmentedProgress>,
    on_event: RefCell<Option<Function>>,
}

impl Bridge {
    /// Forward queued player events to JS, loading segments on track changes
    fn flush(self: &Rc<Self>) {
        for event in self.session.drain_events() {
            if let PlayerEvent::TrackChanged { item_id, .. } = &event {
                self.request_segments(item_id.clone());
            }
            self.emit(&event);
        }
    }

    fn emit<T: serde::Serialize>(&self, payload: &T) {
        let callback = self.on_event.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match serde_wasm_bindgen::to_value(payload) {
            Ok(value) => {
                callback.call1(&JsValue::NULL, &value).ok();
            }
            Err(e) => warn!(error = %e, "Failed to serialize player event"),
        }
    }

    fn request_segments(self: &Rc<Self>, item_id: String) {
        if let SegmentLookup::Resolved(segments) = self.loader.peek(&item_id) {
            self.progress.borrow_mut().set_segments(segments);
            return;
        }

        self.progress.borrow_mut().set_segments(None);
        let bridge = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let segments = bridge.loader.load(&item_id).await;

            // a stale answer stays cached but is not shown
            let still_current = bridge
                .session
                .snapshot()
                .current
                .is_some_and(|item| item.id == item_id);
            if !still_current {
                debug!(item_id = %item_id, "Segments arrived for an item no longer playing");
                return;
            }

            let count = segments.as_ref().map_or(0, |s| s.len());
            bridge.progress.borrow_mut().set_segments(segments);
            bridge.emit(&SegmentsLoaded::new(&item_id, count));
        });
    }
}

/// Browser player
///
/// Owns the page's single `<audio>` element. Call `tick()` from
/// `requestAnimationFrame`; subscribe with `onEvent`.
#[wasm_bindgen]
pub struct WasmPlayer {
    bridge: Rc<Bridge>,
    audio: HtmlAudioElement,
    record: Option<BestRecord<LocalStorageStore>>,
    _element_listeners: Vec<Closure<dyn FnMut()>>,
    key_listener: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create the player; `base_url` is where track folders are served from
    /// (defaults to the page origin)
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let base_url = match base_url {
            Some(url) => url,
            None => format!("{}/", window.location().origin()?),
        };

        let catalog = Catalog::builtin().map_err(to_js)?;
        let config = PlayerConfig::default();
        let timeline_config = TimelineConfig {
            base_url,
            ..TimelineConfig::default()
        };

        let audio = HtmlAudioElement::new()?;
        audio.set_preload("metadata");
        audio.set_cross_origin(Some("anonymous"));

        let clock = PerformanceClock::new().map_err(to_js)?;
        let meter = AudioLevelMeter::new(
            Some(Box::new(WebAudioGraph::new(audio.clone()))),
            config.analyser.clone(),
        );
        let session = PlayerSession::from_catalog(
            &catalog,
            Box::new(WebAudioElement::new(audio.clone())),
            Box::new(clock.clone()),
            config,
            meter,
        );

        let source = HttpTimingSource::new(&timeline_config).map_err(to_js)?;
        let loader = SegmentLoader::new(Rc::new(source), catalog.timing_folders());

        let bridge = Rc::new(Bridge {
            session,
            clock,
            loader,
            progress: RefCell::new(SegmentedProgress::new(timeline_config.clone())),
            timeline: timeline_config,
            on_event: RefCell::new(None),
        });

        let mut element_listeners = Vec::with_capacity(ELEMENT_EVENTS.len());
        for (name, event) in ELEMENT_EVENTS {
            let bridge = Rc::clone(&bridge);
            let callback = Closure::wrap(Box::new(move || {
                bridge.session.handle_element_event(event);
                bridge.flush();
            }) as Box<dyn FnMut()>);
            audio.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
            element_listeners.push(callback);
        }

        let record = match LocalStorageStore::new() {
            Ok(store) => Some(BestRecord::load(store)),
            Err(e) => {
                warn!(error = %e, "Best record storage unavailable");
                None
            }
        };

        Ok(Self {
            bridge,
            audio,
            record,
            _element_listeners: element_listeners,
            key_listener: None,
        })
    }

    /// Install the global keyboard transport (capture phase)
    #[wasm_bindgen(js_name = installKeyboard)]
    pub fn install_keyboard(&mut self) -> Result<(), JsValue> {
        if self.key_listener.is_some() {
            return Ok(());
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let bridge = Rc::clone(&self.bridge);
        let callback = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                .map_or(FocusTarget::Document, |el| {
                    FocusTarget::from_tag(&el.tag_name(), el.is_content_editable())
                });

            let outcome = bridge
                .session
                .handle_key(&KeyPress::new(event.key(), target));
            if outcome.prevent_default {
                event.prevent_default();
            }
            if outcome.stop_propagation {
                event.stop_propagation();
            }
            bridge.flush();
        }) as Box<dyn FnMut(KeyboardEvent)>);

        window.add_event_listener_with_callback_and_bool(
            "keydown",
            callback.as_ref().unchecked_ref(),
            true,
        )?;
        self.key_listener = Some(callback);
        Ok(())
    }

    // ===== Playback Control =====

    #[wasm_bindgen(js_name = playItemById)]
    pub fn play_item_by_id(&self, id: &str) -> bool {
        let found = self.bridge.session.play_item_by_id(id);
        self.bridge.flush();
        found
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        self.bridge.session.toggle_play();
        self.bridge.flush();
    }

    pub fn next(&self) {
        self.bridge.session.next();
        self.bridge.flush();
    }

    pub fn prev(&self) {
        self.bridge.session.prev();
        self.bridge.flush();
    }

    /// Seek to a percentage (0-100) of the duration
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&self, percent: f64) {
        self.bridge.session.seek_to(percent);
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = seekBySec)]
    pub fn seek_by_sec(&self, delta_sec: f64) {
        self.bridge.session.seek_by_sec(delta_sec);
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = closePlayer)]
    pub fn close_player(&self) {
        self.bridge.session.close_player();
        self.bridge.flush();
    }

    /// Dispatch a key press manually (for pages that manage their own listener)
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str, tag_name: &str, content_editable: bool) -> JsValue {
        let press = KeyPress::new(key, FocusTarget::from_tag(tag_name, content_editable));
        let outcome = self.bridge.session.handle_key(&press);
        self.bridge.flush();
        serde_wasm_bindgen::to_value(&KeyHandled::from(outcome)).unwrap_or(JsValue::NULL)
    }

    // ===== Modes & UI flags =====

    /// Set order ("sequential" | "shuffle")
    #[wasm_bindgen(js_name = setOrder)]
    pub fn set_order(&self, order: &str) -> Result<(), JsValue> {
        self.bridge.session.set_order(parse_order(order)?);
        self.bridge.flush();
        Ok(())
    }

    #[wasm_bindgen(js_name = setExcursionOn)]
    pub fn set_excursion_on(&self, on: bool) {
        self.bridge.session.set_excursion_on(on);
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = setAutoAdvance)]
    pub fn set_auto_advance(&self, on: bool) {
        self.bridge.session.set_auto_advance(on);
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = setShowQueue)]
    pub fn set_show_queue(&self, show: bool) {
        self.bridge.session.set_show_queue(show);
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = setFullscreen)]
    pub fn set_fullscreen(&self, open: bool) {
        self.bridge.session.set_fullscreen(open);
        self.bridge.flush();
    }

    // ===== Queue =====

    /// Move an upcoming item one step ("up" | "down")
    #[wasm_bindgen(js_name = moveQueueItem)]
    pub fn move_queue_item(&self, index: usize, direction: &str) -> Result<bool, JsValue> {
        let moved = self
            .bridge
            .session
            .move_queue_item(index, parse_direction(direction)?);
        self.bridge.flush();
        Ok(moved)
    }

    #[wasm_bindgen(js_name = reorderQueue)]
    pub fn reorder_queue(&self, from: usize, to: usize) -> bool {
        let moved = self.bridge.session.reorder_queue(from, to);
        self.bridge.flush();
        moved
    }

    #[wasm_bindgen(js_name = isQueueItemMovable)]
    pub fn is_queue_item_movable(&self, index: usize) -> bool {
        self.bridge.session.is_queue_item_movable(index)
    }

    // ===== Frames & state =====

    /// Advance timers and the audio level; call once per animation frame
    pub fn tick(&self) {
        self.bridge.session.tick();
        self.bridge.flush();
    }

    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.bridge.session.snapshot()).unwrap_or(JsValue::NULL)
    }

    /// Segmented progress bar for the current position
    #[wasm_bindgen(js_name = progressFrame)]
    pub fn progress_frame(&self) -> JsValue {
        let now = self.bridge.clock.now();
        let frame = self.bridge.progress.borrow_mut().frame(
            now,
            self.audio.current_time(),
            self.audio.duration(),
        );
        serde_wasm_bindgen::to_value(&frame).unwrap_or(JsValue::NULL)
    }

    /// Segment gradient for any catalog item, e.g. an inline card player
    ///
    /// Resolves to a CSS gradient, or `null` when the item has no timings.
    /// Cards and the player bar share one cached fetch per track.
    #[wasm_bindgen(js_name = segmentsGradient)]
    pub fn segments_gradient(
        &self,
        item_id: String,
        duration: Option<f64>,
        alpha: Option<f64>,
    ) -> Promise {
        let bridge = Rc::clone(&self.bridge);
        wasm_bindgen_futures::future_to_promise(async move {
            let Some(segments) = bridge.loader.load(&item_id).await else {
                return Ok(JsValue::NULL);
            };
            let gradient = item_gradient(
                &segments,
                duration.unwrap_or(f64::NAN),
                &bridge.timeline,
                alpha.unwrap_or(INLINE_TINT_ALPHA),
            );
            Ok(JsValue::from_str(&gradient))
        })
    }

    /// Pointer over the bar at `percent`; true when the tooltip changed
    #[wasm_bindgen(js_name = hoverTimeline)]
    pub fn hover_timeline(&self, percent: f64) -> bool {
        self.bridge
            .progress
            .borrow_mut()
            .hover_at(percent, self.audio.duration())
    }

    #[wasm_bindgen(js_name = clearTimelineHover)]
    pub fn clear_timeline_hover(&self) -> bool {
        self.bridge.progress.borrow_mut().clear_hover()
    }

    /// Register the event callback, called with one event object at a time
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.bridge.on_event.borrow_mut() = Some(callback);
    }

    // ===== Minigame record =====

    #[wasm_bindgen(js_name = bestRecord)]
    pub fn best_record(&self) -> Option<f64> {
        self.record.as_ref().and_then(|r| r.best())
    }

    /// Register a finished run; returns the best time
    #[wasm_bindgen(js_name = recordTime)]
    pub fn record_time(&mut self, elapsed_secs: f64) -> Result<f64, JsValue> {
        let record = self
            .record
            .as_mut()
            .ok_or_else(|| JsValue::from_str("record storage unavailable"))?;
        record.record_time(elapsed_secs).map_err(to_js)
    }

    // ===== Helpers =====

    /// `M:SS`
    #[wasm_bindgen(js_name = formatTime)]
    pub fn format_time(secs: f64) -> String {
        cyfral_timeline::format_time(secs)
    }

    #[wasm_bindgen(js_name = hexToRgba)]
    pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
        cyfral_timeline::hex_to_rgba(hex, alpha)
    }
}
