//! Save timing: debounced local saves, the periodic autosave, and the
//! save indicator that hides itself after a short while.
//!
//! Both types are driven by explicit `Instant`s so the canvas can be ticked
//! from a UI timer and tested without sleeping.

use std::time::{Duration, Instant};

/// Decides when the next local save is due.
///
/// A burst of mutations produces a single save once the debounce window has
/// passed since the last one. Independently, a save is due every `interval`
/// whether or not anything changed.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    debounce: Duration,
    interval: Duration,
    last_change: Option<Instant>,
    last_save: Instant,
}

impl SaveScheduler {
    pub fn new(debounce: Duration, interval: Duration, now: Instant) -> Self {
        Self {
            debounce,
            interval,
            last_change: None,
            last_save: now,
        }
    }

    /// Record a mutation at `now`.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        if let Some(changed) = self.last_change {
            if now.saturating_duration_since(changed) >= self.debounce {
                return true;
            }
        }
        now.saturating_duration_since(self.last_save) >= self.interval
    }

    /// Record a completed save at `now`.
    pub fn saved(&mut self, now: Instant) {
        self.last_change = None;
        self.last_save = now;
    }

    /// Record a failed save at `now`. The next attempt waits for a new
    /// mutation or the periodic interval.
    pub fn attempted(&mut self, now: Instant) {
        self.last_change = None;
        self.last_save = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Hidden,
    Saving,
    Saved,
    Failed,
}

/// Save status shown to the user. Terminal states hide after `hide_after`.
#[derive(Debug, Clone)]
pub struct SaveIndicator {
    status: SaveStatus,
    changed_at: Option<Instant>,
    hide_after: Duration,
}

impl SaveIndicator {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            status: SaveStatus::Hidden,
            changed_at: None,
            hide_after,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn set(&mut self, status: SaveStatus, now: Instant) {
        self.status = status;
        self.changed_at = Some(now);
    }

    /// Hide a finished status once it has been shown long enough.
    ///
    /// Returns `true` if the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let finished = matches!(self.status, SaveStatus::Saved | SaveStatus::Failed);
        match self.changed_at {
            Some(at) if finished && now.saturating_duration_since(at) >= self.hide_after => {
                self.status = SaveStatus::Hidden;
                self.changed_at = None;
                true
            }
            _ => false,
        }
    }
}
