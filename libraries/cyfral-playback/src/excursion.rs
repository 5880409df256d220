//! Excursion mode: play a short preview window of each track
//!
//! While on, every loaded track is cut to `[start, start + window]`. Long
//! tracks get a random start, short ones start at 0. Leaving the window
//! requests exactly one advance per window; a new load or a seek re-arms it.

use rand::Rng;

/// Preview window of the current track
#[derive(Debug, Clone, Default)]
pub struct ExcursionWindow {
    start: Option<f64>,
    remaining: Option<u32>,
    advancing: bool,
}

impl ExcursionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where a window should start for a track of `duration`
    ///
    /// Tracks longer than `long_track` start uniformly in
    /// `[0, duration - start_margin]`; anything else (including unknown
    /// durations) starts at 0.
    pub fn pick_start<R: Rng + ?Sized>(
        duration: Option<f64>,
        long_track: f64,
        start_margin: f64,
        rng: &mut R,
    ) -> f64 {
        match duration {
            Some(d) if d.is_finite() && d > long_track => {
                rng.gen::<f64>() * (d - start_margin).max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Open a fresh window at `start`
    pub fn begin(&mut self, start: f64, window: f64) {
        self.start = Some(start);
        self.remaining = Some(window.ceil() as u32);
        self.advancing = false;
    }

    /// Turn the window off
    pub fn clear(&mut self) {
        self.start = None;
        self.remaining = None;
        self.advancing = false;
    }

    /// New track loading: allow the next advance again
    pub fn rearm(&mut self) {
        self.advancing = false;
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    /// Whole seconds left, `None` when no window is open
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Update for the current position; true when the caller must advance now
    pub fn on_progress(&mut self, current_time: f64, window: f64) -> bool {
        let Some(start) = self.start else {
            return false;
        };

        let end = start + window;
        self.remaining = Some((end - current_time).ceil().max(0.0) as u32);

        if !self.advancing && current_time >= end {
            self.advancing = true;
            return true;
        }
        false
    }
}
