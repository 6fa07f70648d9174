//! Monotonic time sources.
//!
//! The driver never reads the wall clock directly; it asks a [`TimeSource`]
//! so integration can be tested with [`ManualTimeSource`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps.
pub trait TimeSource: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Time source backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time source that only moves when advanced explicitly.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Mutex<Instant>,
}

impl ManualTimeSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }

    /// Moves the clock forward by fractional `seconds`.
    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds));
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Seconds elapsed from `anchor` to `now`, never negative.
pub fn elapsed_secs(anchor: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(anchor).as_secs_f64()
}
