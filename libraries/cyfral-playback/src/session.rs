//! Shared session handle
//!
//! All views (compact bar, fullscreen overlay, inline item players, queue
//! panel) hold a clone of one [`PlayerSession`]. They read snapshots and call
//! the fixed set of operations; none of them keeps playback state of its own.

use crate::analyser::AudioLevelMeter;
use crate::clock::Clock;
use crate::element::{AudioElement, ElementEvent};
use crate::events::PlayerEvent;
use crate::keyboard::{KeyOutcome, KeyPress};
use crate::manager::PlayerCore;
use crate::types::{MoveDirection, PlaybackOrder, PlayerConfig, PlayerSnapshot};
use cyfral_core::Catalog;
use std::cell::RefCell;
use std::rc::Rc;

/// Cloneable handle to the single player core
#[derive(Clone)]
pub struct PlayerSession {
    core: Rc<RefCell<PlayerCore>>,
}

impl PlayerSession {
    pub fn new(core: PlayerCore) -> Self {
        Self {
            core: Rc::new(RefCell::new(core)),
        }
    }

    /// Session over the catalog's master playlist
    pub fn from_catalog(
        catalog: &Catalog,
        element: Box<dyn AudioElement>,
        clock: Box<dyn Clock>,
        config: PlayerConfig,
        meter: AudioLevelMeter,
    ) -> Self {
        let core = PlayerCore::new(catalog.build_playlist(), element, clock, config).with_meter(meter);
        Self::new(core)
    }

    /// Immutable view of the current state
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.core.borrow().snapshot()
    }

    /// Events queued since the last drain
    pub fn drain_events(&self) -> Vec<PlayerEvent> {
        self.core.borrow_mut().drain_events()
    }

    /// Start of the open excursion window, in seconds
    pub fn excursion_window_start(&self) -> Option<f64> {
        self.core.borrow().excursion_window_start()
    }

    /// Whether the queue panel may drag or move `index`
    pub fn is_queue_item_movable(&self, index: usize) -> bool {
        self.core.borrow().is_queue_item_movable(index)
    }

    pub fn play_item_by_id(&self, id: &str) -> bool {
        self.core.borrow_mut().play_item_by_id(id)
    }

    pub fn toggle_play(&self) {
        self.core.borrow_mut().toggle_play();
    }

    pub fn seek_to(&self, percent: f64) {
        self.core.borrow_mut().seek_to(percent);
    }

    pub fn seek_by_sec(&self, delta_sec: f64) {
        self.core.borrow_mut().seek_by_sec(delta_sec);
    }

    pub fn next(&self) {
        self.core.borrow_mut().next();
    }

    pub fn prev(&self) {
        self.core.borrow_mut().prev();
    }

    pub fn set_order(&self, order: PlaybackOrder) {
        self.core.borrow_mut().set_order(order);
    }

    pub fn set_excursion_on(&self, on: bool) {
        self.core.borrow_mut().set_excursion_on(on);
    }

    pub fn set_auto_advance(&self, on: bool) {
        self.core.borrow_mut().set_auto_advance(on);
    }

    pub fn set_show_queue(&self, show: bool) {
        self.core.borrow_mut().set_show_queue(show);
    }

    pub fn set_fullscreen(&self, open: bool) {
        self.core.borrow_mut().set_fullscreen(open);
    }

    pub fn close_player(&self) {
        self.core.borrow_mut().close_player();
    }

    pub fn move_queue_item(&self, index: usize, direction: MoveDirection) -> bool {
        self.core.borrow_mut().move_queue_item(index, direction)
    }

    pub fn reorder_queue(&self, from: usize, to: usize) -> bool {
        self.core.borrow_mut().reorder_queue(from, to)
    }

    pub fn handle_key(&self, press: &KeyPress) -> KeyOutcome {
        self.core.borrow_mut().handle_key(press)
    }

    /// Forward an audio element notification
    pub fn handle_element_event(&self, event: ElementEvent) {
        self.core.borrow_mut().handle_element_event(event);
    }

    /// Drive timers; call once per animation frame
    pub fn tick(&self) {
        self.core.borrow_mut().tick();
    }
}
