//! Compact player bar visibility transitions

use crate::types::PlayerVisibility;
use std::time::Duration;

/// Timer-driven visibility state machine
#[derive(Debug, Clone)]
pub struct VisibilityMachine {
    state: PlayerVisibility,
    deadline: Option<Duration>,
    enter: Duration,
    exit: Duration,
}

impl VisibilityMachine {
    pub fn new(enter: Duration, exit: Duration) -> Self {
        Self {
            state: PlayerVisibility::Hidden,
            deadline: None,
            enter,
            exit,
        }
    }

    pub fn state(&self) -> PlayerVisibility {
        self.state
    }

    /// Playback requested: start entering unless already shown
    pub fn request_show(&mut self, now: Duration) -> bool {
        match self.state {
            PlayerVisibility::Hidden | PlayerVisibility::Exiting => {
                self.state = PlayerVisibility::Entering;
                self.deadline = Some(now + self.enter);
                true
            }
            PlayerVisibility::Entering | PlayerVisibility::Visible => false,
        }
    }

    /// Close requested: start exiting
    pub fn close(&mut self, now: Duration) -> bool {
        let changed = self.state != PlayerVisibility::Exiting;
        self.state = PlayerVisibility::Exiting;
        self.deadline = Some(now + self.exit);
        changed
    }

    /// Complete a transition whose timer has run out
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.deadline = None;
        self.state = match self.state {
            PlayerVisibility::Entering => PlayerVisibility::Visible,
            PlayerVisibility::Exiting => PlayerVisibility::Hidden,
            other => other,
        };
        true
    }
}
