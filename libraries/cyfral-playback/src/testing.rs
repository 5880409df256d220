//! In-memory audio element for tests and headless simulation
//!
//! Behaves like a media element that loads instantly: `load()` queues
//! `LoadedMetadata`, `play()`/`pause()` queue `Play`/`Pause`, and
//! [`FakeAudioElement::advance`] moves the playhead and queues `TimeUpdate`
//! (plus `Pause` and `Ended` at the end). Events are not delivered on their
//! own; [`pump`] hands them to a session the way a browser event loop would.

use crate::element::{AudioElement, ElementEvent};
use crate::error::{PlaybackError, Result};
use crate::session::PlayerSession;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Duration reported for sources without an explicit one
pub const DEFAULT_FAKE_DURATION: f64 = 200.0;

#[derive(Debug)]
struct FakeState {
    source: Option<String>,
    paused: bool,
    current_time: f64,
    metadata_loaded: bool,
    durations: HashMap<String, Option<f64>>,
    reject_play: bool,
    events: VecDeque<ElementEvent>,
    loads: usize,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            source: None,
            paused: true,
            current_time: 0.0,
            metadata_loaded: false,
            durations: HashMap::new(),
            reject_play: false,
            events: VecDeque::new(),
            loads: 0,
        }
    }
}

impl FakeState {
    fn duration(&self) -> Option<f64> {
        if !self.metadata_loaded {
            return None;
        }
        let source = self.source.as_ref()?;
        self.durations
            .get(source)
            .copied()
            .unwrap_or(Some(DEFAULT_FAKE_DURATION))
    }
}

/// Scriptable audio element; clones share state
#[derive(Debug, Clone, Default)]
pub struct FakeAudioElement {
    state: Rc<RefCell<FakeState>>,
}

impl FakeAudioElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `secs` as the duration of `src` (`None` for a stream without one)
    pub fn set_duration(&self, src: &str, secs: Option<f64>) {
        self.state
            .borrow_mut()
            .durations
            .insert(src.to_string(), secs);
    }

    /// Make `play()` fail, like a browser enforcing autoplay policy
    pub fn set_reject_play(&self, reject: bool) {
        self.state.borrow_mut().reject_play = reject;
    }

    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().current_time
    }

    pub fn paused(&self) -> bool {
        self.state.borrow().paused
    }

    /// How many times `load()` was called
    pub fn load_count(&self) -> usize {
        self.state.borrow().loads
    }

    /// Move the playhead forward by `secs` of playback
    pub fn advance(&self, secs: f64) {
        let mut state = self.state.borrow_mut();
        if state.paused || state.source.is_none() {
            return;
        }

        let mut next = state.current_time + secs;
        let end = state.duration().filter(|&d| next >= d);
        if let Some(end) = end {
            next = end;
        }
        state.current_time = next;
        state.events.push_back(ElementEvent::TimeUpdate);

        if end.is_some() {
            state.paused = true;
            state.events.push_back(ElementEvent::Pause);
            state.events.push_back(ElementEvent::Ended);
        }
    }

    /// Take queued events
    pub fn take_events(&self) -> Vec<ElementEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }
}

impl AudioElement for FakeAudioElement {
    fn set_source(&mut self, src: &str) {
        let mut state = self.state.borrow_mut();
        state.source = Some(src.to_string());
        state.metadata_loaded = false;
    }

    fn has_source(&self) -> bool {
        self.state.borrow().source.is_some()
    }

    fn load(&mut self) {
        let mut state = self.state.borrow_mut();
        state.loads += 1;
        state.current_time = 0.0;
        if !state.paused {
            state.paused = true;
            state.events.push_back(ElementEvent::Pause);
        }
        if state.source.is_some() {
            state.metadata_loaded = true;
            state.events.push_back(ElementEvent::LoadedMetadata);
        }
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.reject_play {
            return Err(PlaybackError::PlayRejected("autoplay not allowed".into()));
        }
        if state.source.is_none() {
            return Err(PlaybackError::AudioElement("no source".into()));
        }
        if state.paused {
            state.paused = false;
            state.events.push_back(ElementEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.paused {
            state.paused = true;
            state.events.push_back(ElementEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut state = self.state.borrow_mut();
        let secs = secs.max(0.0);
        state.current_time = match state.duration() {
            Some(d) => secs.min(d),
            None => secs,
        };
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration()
    }
}

/// Deliver queued element events to the session until none are left
pub fn pump(session: &PlayerSession, element: &FakeAudioElement) {
    loop {
        let events = element.take_events();
        if events.is_empty() {
            break;
        }
        for event in events {
            session.handle_element_event(event);
        }
    }
}
