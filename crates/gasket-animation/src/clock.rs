//! Time sources for the engine's wall-clock actions

use instant::Instant;

/// Monotonic time in seconds. Only differences between readings are meaningful.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Real clock backed by `instant::Instant` (also available on wasm targets)
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to, for fixed-rate drivers and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.time += seconds;
    }

    pub fn set(&mut self, seconds: f64) {
        self.time = seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time
    }
}
