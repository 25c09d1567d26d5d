use std::time::Duration;

use tokio::time::Instant;

/// Monotonic clock reporting time elapsed since its origin.
///
/// Backed by `tokio::time::Instant`, so a paused tokio runtime (tests) sees
/// virtual time while a live runtime sees the OS monotonic clock.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    /// Time elapsed since the origin.
    pub fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }

    /// Moves the origin to the current instant.
    ///
    /// Timestamps taken before a reset are not comparable with later ones.
    pub fn reset(&mut self) {
        self.origin = Instant::now();
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Duration as fractional milliseconds, the unit lag samples are reported in.
pub fn millis_f64(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
