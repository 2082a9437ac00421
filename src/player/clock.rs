use std::time::{Duration, Instant};

/// Monotonic time source for playback bookkeeping.
///
/// The engine only ever subtracts readings, so the origin is arbitrary.
/// Tests drive playback with a manual clock instead of waiting in real time.
pub trait Clock: Send + Sync {
    /// Time elapsed since a fixed, arbitrary origin.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
