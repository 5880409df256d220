//! Seek flash lifetime

use crate::types::SeekFlash;
use std::time::Duration;

/// Latest seek flash and its expiry
#[derive(Debug, Clone, Default)]
pub struct SeekFlashState {
    current: Option<SeekFlash>,
    expires_at: Option<Duration>,
    last_id: u64,
}

impl SeekFlashState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SeekFlash> {
        self.current
    }

    /// Show a new flash, superseding any previous one
    pub fn show(&mut self, delta_sec: f64, now: Duration, lifetime: Duration) -> SeekFlash {
        self.last_id += 1;
        let flash = SeekFlash {
            id: self.last_id,
            delta_sec,
        };
        self.current = Some(flash);
        self.expires_at = Some(now + lifetime);
        flash
    }

    /// Drop an expired flash; returns true if one was cleared
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.expires_at.is_some_and(|at| now >= at) {
            self.expires_at = None;
            return self.current.take().is_some();
        }
        false
    }
}
