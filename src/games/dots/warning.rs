//! Transient invalid-placement warning.

use std::time::{Duration, Instant};
use tracing::debug;

/// A warning that stays visible for a fixed duration after it is raised.
///
/// The deadline is stored rather than a timer, so an expiry that arrives late
/// (after the warning was cleared or raised again) cannot hide a newer warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementWarning {
    duration: Duration,
    visible_until: Option<Instant>,
}

impl PlacementWarning {
    /// Creates a hidden warning with the given lifetime.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            visible_until: None,
        }
    }

    /// Shows the warning, restarting its deadline.
    pub fn raise(&mut self, now: Instant) {
        self.visible_until = Some(now + self.duration);
        debug!(duration_ms = self.duration.as_millis() as u64, "Placement warning raised");
    }

    /// Hides the warning immediately.
    pub fn clear(&mut self) {
        self.visible_until = None;
    }

    /// Hides the warning if its deadline has passed.
    pub fn expire(&mut self, now: Instant) {
        if self.visible_until.is_some_and(|deadline| now >= deadline) {
            self.visible_until = None;
        }
    }

    /// Returns true if the warning is showing at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|deadline| now < deadline)
    }
}
