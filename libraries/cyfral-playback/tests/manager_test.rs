//! Player core scenarios driven through the session and a fake audio element
//!
//! Every test runs on a `ManualClock` and a seeded RNG, so timer and shuffle
//! behaviour is deterministic.

use cyfral_core::{ItemKind, PlaylistItem};
use cyfral_playback::testing::{pump, FakeAudioElement};
use cyfral_playback::{
    AudioLevelMeter, ManualClock, PlaybackOrder, PlayerConfig, PlayerCore, PlayerEvent,
    PlayerSession, PlayerVisibility,
};
use std::sync::Once;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ===== Test Helpers =====

struct Harness {
    session: PlayerSession,
    element: FakeAudioElement,
    clock: ManualClock,
}

fn src(i: usize) -> String {
    format!("/audio/t{i}.mp3")
}

fn items(n: usize) -> Vec<PlaylistItem> {
    (0..n)
        .map(|i| {
            PlaylistItem::new(
                format!("t{i}"),
                format!("Track {i}"),
                "Lil Cyfral",
                src(i),
                ItemKind::Track,
            )
        })
        .collect()
}

fn seeded() -> PlayerConfig {
    PlayerConfig {
        rng_seed: Some(7),
        ..PlayerConfig::default()
    }
}

fn harness_with(n: usize, config: PlayerConfig) -> Harness {
    init_tracing();
    let element = FakeAudioElement::new();
    let clock = ManualClock::new();
    let core = PlayerCore::new(
        items(n),
        Box::new(element.clone()),
        Box::new(clock.clone()),
        config,
    )
    .with_meter(AudioLevelMeter::unsupported());

    Harness {
        session: PlayerSession::new(core),
        element,
        clock,
    }
}

fn harness(n: usize) -> Harness {
    harness_with(n, seeded())
}

impl Harness {
    fn play(&self, id: &str) {
        assert!(self.session.play_item_by_id(id));
        self.pump();
    }

    fn pump(&self) {
        pump(&self.session, &self.element);
    }

    /// Let `secs` of audio play, past the progress throttle
    fn play_for(&self, secs: f64) {
        self.clock.advance_ms(150);
        self.element.advance(secs);
        self.pump();
    }

    fn index(&self) -> Option<usize> {
        self.session.snapshot().current_index
    }
}

fn count(events: &[PlayerEvent], pred: impl Fn(&PlayerEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ===== Advance =====

#[test]
fn sequential_end_of_queue_pauses_in_place() {
    let h = harness(3);
    h.play("t2");
    assert!(h.session.snapshot().is_playing);

    h.play_for(500.0);

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.current_index, Some(2));
    assert!(!snapshot.is_playing);
    assert_eq!(h.element.load_count(), 1);
}

#[test]
fn natural_end_plays_next_item() {
    let h = harness(3);
    h.play("t0");
    h.play_for(500.0);

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.current_index, Some(1));
    assert!(snapshot.is_playing);
    assert_eq!(h.element.source(), Some(src(1)));
    assert_eq!(h.element.position(), 0.0);
}

#[test]
fn auto_advance_off_stops_but_next_still_skips() {
    let h = harness(3);
    h.session.set_auto_advance(false);
    h.play("t0");
    h.play_for(500.0);

    assert_eq!(h.index(), Some(0));
    assert!(!h.session.snapshot().is_playing);

    h.session.next();
    h.pump();
    assert_eq!(h.index(), Some(1));
    assert!(h.session.snapshot().is_playing);
}

#[test]
fn explicit_next_on_last_item_pauses() {
    let h = harness(3);
    h.play("t2");

    h.session.next();
    h.pump();

    assert_eq!(h.index(), Some(2));
    assert!(!h.session.snapshot().is_playing);
    assert_eq!(h.element.load_count(), 1);
}

#[test]
fn track_changed_carries_previous_item() {
    let h = harness(3);
    h.play("t0");
    h.session.drain_events();

    h.session.next();
    let events = h.session.drain_events();
    assert!(events.contains(&PlayerEvent::TrackChanged {
        item_id: "t1".to_string(),
        index: 1,
        previous_item_id: Some("t0".to_string()),
    }));
}

#[test]
fn shuffle_advance_never_repeats_current() {
    let h = harness(6);
    h.play("t0");
    h.session.set_order(PlaybackOrder::Shuffle);

    for _ in 0..100 {
        let before = h.index();
        h.session.next();
        h.pump();
        let after = h.index();
        assert!(after.is_some());
        assert_ne!(before, after, "shuffle picked the playing item again");
    }
}

#[test]
fn shuffle_with_single_item_does_nothing() {
    let h = harness(1);
    h.play("t0");
    h.session.set_order(PlaybackOrder::Shuffle);

    h.session.next();
    h.pump();

    assert_eq!(h.index(), Some(0));
    assert_eq!(h.element.load_count(), 1);
    assert!(h.session.snapshot().is_playing);
}

// ===== Order =====

#[test]
fn shuffle_pins_playing_item_without_interrupting_it() {
    let h = harness(5);
    h.play("t3");
    h.play_for(12.0);

    h.session.set_order(PlaybackOrder::Shuffle);
    h.pump();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.current.as_ref().unwrap().id, "t3");
    assert_eq!(snapshot.queue[0].id, "t3");
    assert_eq!(snapshot.current_index, Some(0));
    assert!(snapshot.is_playing);
    assert_eq!(h.element.load_count(), 1);
    assert_eq!(h.element.position(), 12.0);

    let mut ids: Vec<_> = snapshot.queue.iter().map(|i| i.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, ["t0", "t1", "t2", "t3", "t4"]);
}

#[test]
fn sequential_restores_catalog_order_and_relocates_current() {
    let h = harness(5);
    h.play("t3");
    h.session.set_order(PlaybackOrder::Shuffle);
    h.session.set_order(PlaybackOrder::Sequential);
    h.pump();

    let snapshot = h.session.snapshot();
    let ids: Vec<_> = snapshot.queue.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["t0", "t1", "t2", "t3", "t4"]);
    assert_eq!(snapshot.current_index, Some(3));
    assert!(snapshot.is_playing);
    assert_eq!(h.element.load_count(), 1);
}

#[test]
fn order_change_emits_queue_and_order_events() {
    let h = harness(4);
    h.play("t0");
    h.session.drain_events();

    h.session.set_order(PlaybackOrder::Shuffle);
    let events = h.session.drain_events();
    assert!(events.contains(&PlayerEvent::OrderChanged {
        order: PlaybackOrder::Shuffle
    }));
    assert!(events.contains(&PlayerEvent::QueueChanged));
    assert_eq!(h.session.snapshot().order, PlaybackOrder::Shuffle);
}

// ===== Seeking =====

#[test]
fn seek_by_sec_clamps_to_known_duration() {
    let h = harness(2);
    h.element.set_duration(&src(0), Some(100.0));
    h.play("t0");

    h.session.seek_by_sec(98.0);
    h.clock.advance_ms(40);
    h.session.seek_by_sec(5.0);

    assert_eq!(h.element.position(), 100.0);
    assert_eq!(h.session.snapshot().current_time, 100.0);

    h.clock.advance_ms(40);
    h.session.seek_by_sec(-500.0);
    assert_eq!(h.element.position(), 0.0);
}

#[test]
fn seek_by_sec_without_duration_only_clamps_at_zero() {
    let h = harness(2);
    h.element.set_duration(&src(0), None);
    h.play("t0");

    h.session.seek_by_sec(-5.0);
    assert_eq!(h.element.position(), 0.0);

    h.clock.advance_ms(40);
    h.session.seek_by_sec(30.0);
    assert_eq!(h.element.position(), 30.0);
}

#[test]
fn rapid_seeks_are_dropped() {
    let h = harness(2);
    h.play("t0");

    h.session.seek_by_sec(5.0);
    h.clock.advance_ms(10);
    h.session.seek_by_sec(5.0);
    assert_eq!(h.element.position(), 5.0);

    h.clock.advance_ms(30);
    h.session.seek_by_sec(5.0);
    assert_eq!(h.element.position(), 10.0);
}

#[test]
fn seek_to_is_percent_of_duration() {
    let h = harness(2);
    h.element.set_duration(&src(0), Some(100.0));
    h.play("t0");

    h.session.seek_to(25.0);
    assert_eq!(h.element.position(), 25.0);

    h.session.seek_to(150.0);
    assert_eq!(h.element.position(), 100.0);

    h.session.seek_to(f64::NAN);
    assert_eq!(h.element.position(), 100.0);
}

#[test]
fn seek_to_without_duration_is_ignored() {
    let h = harness(2);
    h.session.seek_to(50.0);
    assert_eq!(h.element.position(), 0.0);
    assert!(h.session.drain_events().is_empty());
}

#[test]
fn seek_flash_clears_after_its_lifetime() {
    let h = harness(2);
    h.play("t0");
    h.session.drain_events();

    h.session.seek_by_sec(-5.0);
    let flash = h.session.snapshot().seek_flash.unwrap();
    assert_eq!(flash.delta_sec, -5.0);
    assert_eq!(flash.label(), "-5 сек");

    h.clock.advance_ms(649);
    h.session.tick();
    assert!(h.session.snapshot().seek_flash.is_some());

    h.clock.advance_ms(1);
    h.session.tick();
    assert!(h.session.snapshot().seek_flash.is_none());

    let events = h.session.drain_events();
    assert_eq!(count(&events, |e| matches!(e, PlayerEvent::SeekFlashShown { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, PlayerEvent::SeekFlashCleared)), 1);
}

#[test]
fn newer_seek_flash_supersedes_older() {
    let h = harness(2);
    h.play("t0");

    h.session.seek_by_sec(5.0);
    h.clock.advance_ms(400);
    h.session.seek_by_sec(5.0);
    let second = h.session.snapshot().seek_flash.unwrap();

    h.clock.advance_ms(300);
    h.session.tick();
    assert_eq!(h.session.snapshot().seek_flash, Some(second));
}

// ===== Play / pause =====

#[test]
fn rejected_play_leaves_player_paused() {
    let h = harness(3);
    h.element.set_reject_play(true);

    assert!(h.session.play_item_by_id("t1"));
    h.pump();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.current.unwrap().id, "t1");
    assert!(!snapshot.is_playing);
    assert_eq!(h.element.source(), Some(src(1)));

    h.element.set_reject_play(false);
    h.session.toggle_play();
    h.pump();
    assert!(h.session.snapshot().is_playing);
}

#[test]
fn playing_current_item_again_resumes_in_place() {
    let h = harness(3);
    h.play("t0");
    h.play_for(42.0);

    h.session.toggle_play();
    h.pump();
    assert!(!h.session.snapshot().is_playing);

    h.play("t0");
    assert!(h.session.snapshot().is_playing);
    assert_eq!(h.element.load_count(), 1);
    assert_eq!(h.element.position(), 42.0);
}

#[test]
fn unknown_id_is_ignored() {
    let h = harness(3);
    assert!(!h.session.play_item_by_id("nope"));
    h.pump();

    let snapshot = h.session.snapshot();
    assert!(snapshot.current.is_none());
    assert_eq!(snapshot.visibility, PlayerVisibility::Hidden);
    assert_eq!(h.element.load_count(), 0);
}

#[test]
fn progress_is_throttled() {
    let h = harness(2);
    h.play("t0");
    h.session.drain_events();

    h.element.advance(1.0);
    h.pump();
    h.clock.advance_ms(50);
    h.element.advance(1.0);
    h.pump();
    h.clock.advance_ms(50);
    h.element.advance(1.0);
    h.pump();

    let events = h.session.drain_events();
    assert_eq!(count(&events, |e| matches!(e, PlayerEvent::Progress { .. })), 2);
    assert_eq!(h.session.snapshot().current_time, 3.0);
}

// ===== Prev =====

#[test]
fn prev_restarts_then_steps_back() {
    let h = harness(3);
    h.play("t1");
    h.play_for(10.0);

    h.session.prev();
    h.pump();
    assert_eq!(h.element.position(), 0.0);
    assert_eq!(h.index(), Some(1));
    assert_eq!(h.element.load_count(), 1);

    h.session.prev();
    h.pump();
    assert_eq!(h.index(), Some(0));
    assert_eq!(h.element.load_count(), 2);

    h.session.prev();
    h.pump();
    assert_eq!(h.index(), Some(0));
    assert_eq!(h.element.load_count(), 2);
}

// ===== Visibility =====

#[test]
fn player_bar_enters_and_exits_on_timers() {
    let h = harness(2);
    h.play("t0");
    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Entering);

    h.clock.advance_ms(2499);
    h.session.tick();
    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Entering);

    h.clock.advance_ms(1);
    h.session.tick();
    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Visible);

    h.session.set_show_queue(true);
    h.session.close_player();
    h.pump();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.visibility, PlayerVisibility::Exiting);
    assert!(!snapshot.is_playing);
    assert!(!snapshot.show_queue);

    h.clock.advance_ms(600);
    h.session.tick();
    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Hidden);
}

#[test]
fn play_during_exit_enters_again() {
    let h = harness(2);
    h.play("t0");
    h.clock.advance_ms(2500);
    h.session.tick();

    h.session.close_player();
    h.pump();
    h.clock.advance_ms(300);
    h.play("t0");

    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Entering);
    assert!(h.session.snapshot().is_playing);

    // the old exit deadline must not hide the bar
    h.clock.advance_ms(300);
    h.session.tick();
    assert_eq!(h.session.snapshot().visibility, PlayerVisibility::Entering);
}

// ===== Excursion =====

fn excursion() -> PlayerConfig {
    PlayerConfig {
        excursion: true,
        ..seeded()
    }
}

#[test]
fn excursion_window_fits_inside_long_track() {
    for seed in 0..20 {
        let h = harness_with(
            3,
            PlayerConfig {
                rng_seed: Some(seed),
                ..excursion()
            },
        );
        h.play("t0");

        let start = h.session.excursion_window_start().unwrap();
        assert!((0.0..=189.9).contains(&start), "start {start} out of range");
        assert_eq!(h.element.position(), start);
        assert_eq!(h.session.snapshot().excursion_remaining, Some(10));
    }
}

#[test]
fn leaving_the_window_advances_once() {
    let h = harness_with(3, excursion());
    h.play("t0");
    h.session.drain_events();

    h.play_for(10.0);

    let events = h.session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, PlayerEvent::ExcursionAdvanced { .. })),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(e, PlayerEvent::TrackChanged { .. })),
        1
    );
    assert_eq!(h.index(), Some(1));
    assert!(h.session.snapshot().is_playing);

    // the next item gets a fresh window
    let start = h.session.excursion_window_start().unwrap();
    assert_eq!(h.element.position(), start);
}

#[test]
fn exhausted_window_does_not_fire_twice() {
    let h = harness_with(
        3,
        PlayerConfig {
            auto_advance: false,
            ..excursion()
        },
    );
    h.play("t0");
    h.play_for(10.0);

    assert_eq!(h.index(), Some(0));
    assert!(!h.session.snapshot().is_playing);
    h.session.drain_events();

    h.session.toggle_play();
    h.pump();
    h.play_for(0.05);

    let events = h.session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, PlayerEvent::ExcursionAdvanced { .. })),
        0
    );
    assert_eq!(h.session.snapshot().excursion_remaining, Some(0));
    assert!(h.session.snapshot().is_playing);
}

#[test]
fn seek_moves_the_excursion_window() {
    let h = harness_with(3, excursion());
    h.play("t0");

    h.session.seek_to(50.0);
    assert_eq!(h.session.excursion_window_start(), Some(100.0));
    assert_eq!(h.session.snapshot().excursion_remaining, Some(10));

    h.play_for(4.5);
    assert_eq!(h.session.snapshot().excursion_remaining, Some(6));
    assert_eq!(h.index(), Some(0));

    h.play_for(5.5);
    assert_eq!(h.index(), Some(1));
}

#[test]
fn relative_seek_moves_the_excursion_window() {
    let h = harness_with(3, excursion());
    h.play("t0");
    h.play_for(4.0);
    let before = h.session.excursion_window_start().unwrap();

    h.session.seek_by_sec(5.0);

    let position = h.element.position();
    assert!(position > before);
    assert_eq!(h.session.excursion_window_start(), Some(position));
    assert_eq!(h.session.snapshot().excursion_remaining, Some(10));
    assert_eq!(h.index(), Some(0));
}

#[test]
fn prev_restart_reopens_window_at_zero() {
    let h = harness_with(3, excursion());
    h.play("t1");
    h.play_for(4.0);

    h.session.prev();
    h.pump();

    assert_eq!(h.index(), Some(1));
    assert_eq!(h.element.position(), 0.0);
    assert_eq!(h.session.excursion_window_start(), Some(0.0));
    assert_eq!(h.session.snapshot().excursion_remaining, Some(10));
    assert_eq!(h.element.load_count(), 1);
}

#[test]
fn short_track_window_starts_at_zero() {
    let h = harness_with(2, excursion());
    h.element.set_duration(&src(0), Some(8.0));
    h.play("t0");

    assert_eq!(h.session.excursion_window_start(), Some(0.0));
    assert_eq!(h.element.position(), 0.0);
}

#[test]
fn toggling_excursion_windows_current_position() {
    let h = harness(2);
    h.play("t0");
    h.play_for(30.0);

    h.session.set_excursion_on(true);
    h.pump();
    let start = h.session.excursion_window_start().unwrap();
    assert_eq!(h.element.position(), start);
    assert!(h.session.snapshot().is_playing);
    assert_eq!(h.session.snapshot().excursion_remaining, Some(10));

    h.session.set_excursion_on(false);
    let snapshot = h.session.snapshot();
    assert!(!snapshot.excursion_on);
    assert_eq!(snapshot.excursion_remaining, None);
    assert_eq!(h.session.excursion_window_start(), None);
}

// ===== UI flags =====

#[test]
fn ui_flags_emit_only_on_change() {
    let h = harness(2);
    h.session.set_fullscreen(true);
    h.session.set_fullscreen(true);
    h.session.set_show_queue(true);
    h.session.set_auto_advance(true);

    let events = h.session.drain_events();
    assert_eq!(
        events,
        vec![
            PlayerEvent::FullscreenChanged { open: true },
            PlayerEvent::ShowQueueChanged { show: true },
        ]
    );

    let snapshot = h.session.snapshot();
    assert!(snapshot.is_fullscreen);
    assert!(snapshot.show_queue);
    assert!(snapshot.auto_advance);
}
