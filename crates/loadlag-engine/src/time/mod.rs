//! Time subsystem.
//!
//! All sampler arithmetic uses origin-relative [`Duration`](std::time::Duration)
//! timestamps rather than `Instant`, so test hosts can fabricate any point in
//! time. [`MonotonicClock`] produces those timestamps from a real clock.

mod clock;

pub use clock::{millis_f64, MonotonicClock};
