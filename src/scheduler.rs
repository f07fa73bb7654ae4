//! Gravity cadence and frame timing.

use std::time::Instant;

/// Default gravity interval.
pub const DROP_INTERVAL_MS: u64 = 1000;

/// Accumulates elapsed time and fires one gravity step once the counter passes the interval.
/// Time beyond the interval is dropped, not carried into the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTimer {
    interval_ms: u64,
    counter_ms: u64,
}

impl DropTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            counter_ms: 0,
        }
    }

    /// Adds `delta_ms`; true when a gravity step is due (counter is then back at zero).
    pub fn tick(&mut self, delta_ms: u64) -> bool {
        self.counter_ms = self.counter_ms.saturating_add(delta_ms);
        if self.counter_ms > self.interval_ms {
            self.counter_ms = 0;
            true
        } else {
            false
        }
    }
}

impl Default for DropTimer {
    fn default() -> Self {
        Self::new(DROP_INTERVAL_MS)
    }
}

/// Monotonic clock that hands out the time since the previous call.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn delta_ms(&mut self) -> u64 {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        delta.as_millis().min(u128::from(u64::MAX)) as u64
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
