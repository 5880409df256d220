//! Player core - sole owner of the audio element and the queue
//!
//! Every mutation of transport state goes through a method here. Element
//! notifications come back in through [`PlayerCore::handle_element_event`],
//! timers advance in [`PlayerCore::tick`], and observers read
//! [`PlayerCore::snapshot`] or drain [`PlayerEvent`]s.

use crate::{
    analyser::AudioLevelMeter,
    clock::Clock,
    element::{known_duration, AudioElement, ElementEvent},
    events::PlayerEvent,
    excursion::ExcursionWindow,
    flash::SeekFlashState,
    keyboard::{resolve_key, KeyContext, KeyOutcome, KeyPress, TransportAction},
    queue::Queue,
    shuffle::pick_other_index,
    types::{MoveDirection, PlaybackOrder, PlayerConfig, PlayerSnapshot, PlayerVisibility},
    visibility::VisibilityMachine,
};
use cyfral_core::PlaylistItem;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Player state machine over one audio element
pub struct PlayerCore {
    config: PlayerConfig,
    element: Box<dyn AudioElement>,
    clock: Box<dyn Clock>,
    rng: StdRng,

    /// Catalog order, restored when leaving shuffle
    master: Vec<PlaylistItem>,
    queue: Queue,

    order: PlaybackOrder,
    auto_advance: bool,
    excursion_on: bool,
    excursion: ExcursionWindow,

    // Transport mirror
    is_playing: bool,
    current_time: f64,
    duration: Option<f64>,
    last_progress: Option<Duration>,
    last_seek: Option<Duration>,

    flash: SeekFlashState,
    visibility: VisibilityMachine,
    show_queue: bool,
    fullscreen: bool,
    meter: AudioLevelMeter,

    pending_events: Vec<PlayerEvent>,
}

impl PlayerCore {
    /// Create a player over `master`; the queue starts as a copy of it
    pub fn new(
        master: Vec<PlaylistItem>,
        element: Box<dyn AudioElement>,
        clock: Box<dyn Clock>,
        config: PlayerConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let visibility = VisibilityMachine::new(
            Duration::from_millis(config.enter_transition_ms),
            Duration::from_millis(config.exit_transition_ms),
        );

        Self {
            queue: Queue::new(master.clone()),
            master,
            element,
            clock,
            rng,
            order: config.order,
            auto_advance: config.auto_advance,
            excursion_on: config.excursion,
            excursion: ExcursionWindow::new(),
            is_playing: false,
            current_time: 0.0,
            duration: None,
            last_progress: None,
            last_seek: None,
            flash: SeekFlashState::new(),
            visibility,
            show_queue: false,
            fullscreen: false,
            meter: AudioLevelMeter::unsupported(),
            pending_events: Vec::new(),
            config,
        }
    }

    /// Attach the audio level meter
    pub fn with_meter(mut self, meter: AudioLevelMeter) -> Self {
        self.meter = meter;
        self
    }

    // ===== Playback Control =====

    /// Play the item with `id`, showing the player bar if needed
    ///
    /// Returns false when the id is not in the queue.
    pub fn play_item_by_id(&mut self, id: &str) -> bool {
        let Some(index) = self.queue.position_of(id) else {
            debug!(item_id = id, "Play requested for unknown item");
            return false;
        };

        let now = self.clock.now();
        if self.visibility.request_show(now) {
            self.emit_visibility();
        }

        if self.queue.current_index() == Some(index) && self.element.has_source() {
            self.try_play();
        } else {
            self.load_and_play(index);
        }
        true
    }

    /// Pause when playing, otherwise try to play
    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.element.pause();
        } else {
            self.try_play();
        }
    }

    /// Skip forward, ignoring the auto-advance setting
    pub fn next(&mut self) {
        self.advance(false);
    }

    /// Restart the current item, or step back one item near its start
    pub fn prev(&mut self) {
        if self.element.current_time() > self.config.prev_restart_secs {
            self.set_position(0.0);
            if self.excursion_on {
                self.open_excursion_window(0.0);
            }
            return;
        }

        if let Some(index) = self.queue.current_index().filter(|&i| i > 0) {
            self.load_and_play(index - 1);
        }
    }

    // ===== Seeking =====

    /// Seek to `percent` (0-100) of the known duration
    pub fn seek_to(&mut self, percent: f64) {
        let Some(duration) = known_duration(&*self.element) else {
            return;
        };
        if !percent.is_finite() {
            return;
        }

        let target = percent.clamp(0.0, 100.0) / 100.0 * duration;
        self.set_position(target);
        if self.excursion_on {
            self.open_excursion_window(target);
        }
    }

    /// Seek relative to the current position
    ///
    /// Requests closer together than the seek throttle are dropped.
    pub fn seek_by_sec(&mut self, delta_sec: f64) {
        if !delta_sec.is_finite() {
            return;
        }

        let now = self.clock.now();
        if self
            .last_seek
            .is_some_and(|last| now.saturating_sub(last) < self.config.seek_throttle())
        {
            trace!(delta_sec, "Seek throttled");
            return;
        }
        self.last_seek = Some(now);

        let wanted = self.element.current_time() + delta_sec;
        let target = match known_duration(&*self.element) {
            Some(duration) => wanted.clamp(0.0, duration),
            None => wanted.max(0.0),
        };

        self.set_position(target);
        if self.excursion_on {
            self.open_excursion_window(target);
        }

        let lifetime = Duration::from_millis(self.config.seek_flash_ms);
        let flash = self.flash.show(delta_sec, now, lifetime);
        self.pending_events.push(PlayerEvent::SeekFlashShown { flash });
    }

    // ===== Modes =====

    /// Switch playback order without interrupting the current item
    ///
    /// With nothing loaded yet there is no item to pin or relocate, so the
    /// queue is reordered and still has no current item; the first
    /// `play_item_by_id` picks one.
    pub fn set_order(&mut self, order: PlaybackOrder) {
        match order {
            PlaybackOrder::Shuffle => self.queue.pin_current_and_shuffle(&mut self.rng),
            PlaybackOrder::Sequential => self.queue.restore(&self.master),
        }
        self.order = order;

        info!(?order, current_index = ?self.queue.current_index(), "Playback order changed");
        self.pending_events.push(PlayerEvent::OrderChanged { order });
        self.pending_events.push(PlayerEvent::QueueChanged);
    }

    /// Turn excursion previews on or off
    pub fn set_excursion_on(&mut self, on: bool) {
        self.excursion_on = on;
        self.pending_events.push(PlayerEvent::ExcursionChanged { on });
        info!(on, "Excursion mode changed");

        if !on {
            self.excursion.clear();
            self.emit_excursion_remaining();
            return;
        }

        let start = self.pick_excursion_start();
        self.set_position(start);
        self.open_excursion_window(start);

        if !self.element.is_paused() {
            self.try_play();
        }
    }

    pub fn set_auto_advance(&mut self, on: bool) {
        if self.auto_advance != on {
            self.auto_advance = on;
            self.pending_events.push(PlayerEvent::AutoAdvanceChanged { on });
        }
    }

    pub fn set_show_queue(&mut self, show: bool) {
        if self.show_queue != show {
            self.show_queue = show;
            self.pending_events.push(PlayerEvent::ShowQueueChanged { show });
        }
    }

    pub fn set_fullscreen(&mut self, open: bool) {
        if self.fullscreen != open {
            self.fullscreen = open;
            self.pending_events.push(PlayerEvent::FullscreenChanged { open });
        }
    }

    /// Hide the player bar: pause, close the queue panel, animate out
    pub fn close_player(&mut self) {
        let now = self.clock.now();
        if self.visibility.close(now) {
            self.emit_visibility();
        }
        self.element.pause();
        self.set_show_queue(false);
    }

    // ===== Queue =====

    /// Swap an upcoming item with its neighbour
    pub fn move_queue_item(&mut self, index: usize, direction: MoveDirection) -> bool {
        let moved = self.queue.move_item(index, direction);
        if moved {
            self.pending_events.push(PlayerEvent::QueueChanged);
        }
        moved
    }

    /// Move an upcoming item to another upcoming position
    pub fn reorder_queue(&mut self, from: usize, to: usize) -> bool {
        let moved = self.queue.reorder(from, to);
        if moved {
            self.pending_events.push(PlayerEvent::QueueChanged);
        }
        moved
    }

    /// Whether the queue panel may drag or move `index`
    pub fn is_queue_item_movable(&self, index: usize) -> bool {
        self.queue.is_movable(index)
    }

    // ===== Element & timers =====

    /// Feed a notification from the audio element
    pub fn handle_element_event(&mut self, event: ElementEvent) {
        match event {
            ElementEvent::Play => self.set_playing(true),
            ElementEvent::Pause => self.set_playing(false),
            ElementEvent::LoadedMetadata => self.on_metadata(),
            ElementEvent::TimeUpdate => self.on_time_update(),
            ElementEvent::Ended => self.advance(true),
        }
    }

    /// Run timer-driven transitions and sample the audio level
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if self.visibility.tick(now) {
            self.emit_visibility();
        }
        if self.flash.tick(now) {
            self.pending_events.push(PlayerEvent::SeekFlashCleared);
        }

        let before = self.meter.level();
        let level = self.meter.update(now, self.is_playing, self.fullscreen);
        if level != before {
            self.pending_events.push(PlayerEvent::AudioLevel { level });
        }
    }

    /// Apply a global key press
    pub fn handle_key(&mut self, press: &KeyPress) -> KeyOutcome {
        let ctx = KeyContext {
            has_current: self.queue.current_item().is_some(),
            player_hidden: self.visibility.state() == PlayerVisibility::Hidden,
            fullscreen_open: self.fullscreen,
        };
        let outcome = resolve_key(press, ctx, self.config.keyboard_seek_secs);

        match outcome.action {
            Some(TransportAction::OpenFullscreen) => self.set_fullscreen(true),
            Some(TransportAction::CloseFullscreen) => self.set_fullscreen(false),
            Some(TransportAction::TogglePlay) => self.toggle_play(),
            Some(TransportAction::SeekBy(delta)) => self.seek_by_sec(delta),
            None => {}
        }
        outcome
    }

    // ===== State Queries =====

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current: self.queue.current_item().cloned(),
            current_index: self.queue.current_index(),
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            progress: self.progress(),
            seek_flash: self.flash.current(),
            order: self.order,
            excursion_on: self.excursion_on,
            excursion_remaining: self.excursion.remaining(),
            auto_advance: self.auto_advance,
            queue: self.queue.items().to_vec(),
            visibility: self.visibility.state(),
            show_queue: self.show_queue,
            is_fullscreen: self.fullscreen,
            audio_level: self.meter.level(),
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.queue.current_item()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn order(&self) -> PlaybackOrder {
        self.order
    }

    pub fn visibility(&self) -> PlayerVisibility {
        self.visibility.state()
    }

    pub fn excursion_window_start(&self) -> Option<f64> {
        self.excursion.start()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Played share of the known duration, 0-100
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) => (self.current_time / duration * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn load_and_play(&mut self, index: usize) {
        let Some(item) = self.queue.get(index).cloned() else {
            return;
        };
        let previous_item_id = self.queue.current_item().map(|i| i.id.clone());

        self.excursion.rearm();
        self.queue.set_current(index);
        self.element.set_source(&item.audio_src);
        self.element.load();
        self.current_time = 0.0;
        self.duration = None;

        info!(item_id = %item.id, index, "Loading item");
        self.pending_events.push(PlayerEvent::TrackChanged {
            item_id: item.id,
            index,
            previous_item_id,
        });

        self.try_play();
    }

    fn try_play(&mut self) {
        if let Err(e) = self.element.play() {
            debug!(error = %e, "Play request failed");
        }
    }

    /// Move on after an item ends (`natural`) or on an explicit skip
    fn advance(&mut self, natural: bool) {
        if natural && !self.auto_advance {
            self.element.pause();
            return;
        }

        match self.order {
            PlaybackOrder::Shuffle => {
                if self.queue.len() <= 1 {
                    return;
                }
                if let Some(index) =
                    pick_other_index(self.queue.len(), self.queue.current_index(), &mut self.rng)
                {
                    self.load_and_play(index);
                }
            }
            PlaybackOrder::Sequential => {
                let next = self.queue.current_index().map_or(0, |i| i + 1);
                if next < self.queue.len() {
                    self.load_and_play(next);
                } else {
                    debug!("End of queue");
                    self.element.pause();
                }
            }
        }
    }

    fn on_metadata(&mut self) {
        self.duration = known_duration(&*self.element);
        self.excursion.rearm();
        self.pending_events.push(PlayerEvent::DurationChanged {
            duration: self.duration,
        });

        if !self.excursion_on {
            if self.excursion.remaining().is_some() {
                self.excursion.clear();
                self.emit_excursion_remaining();
            }
            return;
        }

        let start = self.pick_excursion_start();
        self.set_position(start);
        self.open_excursion_window(start);
    }

    fn on_time_update(&mut self) {
        let now = self.clock.now();
        if self
            .last_progress
            .is_some_and(|last| now.saturating_sub(last) < self.config.progress_throttle())
        {
            return;
        }
        self.last_progress = Some(now);

        self.current_time = self.element.current_time();
        self.pending_events.push(PlayerEvent::Progress {
            current_time: self.current_time,
            duration: self.duration,
            progress: self.progress(),
        });

        if !self.excursion_on {
            return;
        }

        let before = self.excursion.remaining();
        let exhausted = self
            .excursion
            .on_progress(self.current_time, self.config.excursion_window_secs);
        if self.excursion.remaining() != before {
            self.emit_excursion_remaining();
        }

        if exhausted {
            let from_item_id = self
                .queue
                .current_item()
                .map(|i| i.id.clone())
                .unwrap_or_default();
            debug!(item_id = %from_item_id, "Excursion window finished");
            self.pending_events
                .push(PlayerEvent::ExcursionAdvanced { from_item_id });
            self.advance(true);
        }
    }

    fn pick_excursion_start(&mut self) -> f64 {
        ExcursionWindow::pick_start(
            known_duration(&*self.element),
            self.config.excursion_long_track_secs,
            self.config.excursion_start_margin_secs,
            &mut self.rng,
        )
    }

    fn open_excursion_window(&mut self, start: f64) {
        self.excursion.begin(start, self.config.excursion_window_secs);
        self.emit_excursion_remaining();
    }

    fn set_position(&mut self, secs: f64) {
        self.element.set_current_time(secs);
        self.current_time = secs;
        self.pending_events.push(PlayerEvent::Progress {
            current_time: secs,
            duration: self.duration,
            progress: self.progress(),
        });
    }

    fn set_playing(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.pending_events.push(PlayerEvent::StateChanged {
                is_playing: playing,
            });
        }
    }

    fn emit_visibility(&mut self) {
        let visibility = self.visibility.state();
        debug!(?visibility, "Player visibility changed");
        self.pending_events
            .push(PlayerEvent::VisibilityChanged { visibility });
    }

    fn emit_excursion_remaining(&mut self) {
        self.pending_events.push(PlayerEvent::ExcursionRemaining {
            remaining: self.excursion.remaining(),
        });
    }
}
