//! Tokio-backed host timers and the measurement event loop.
//!
//! The sampler stays single-threaded: timer tasks only post fired handles
//! into a channel, and [`run_measurement`] is the one place that feeds them
//! back into [`LagSampler::dispatch`](crate::sampler::LagSampler::dispatch).

mod driver;
mod timers;

pub use driver::run_measurement;
pub use timers::{TimerEvents, TokioTimerHost};
