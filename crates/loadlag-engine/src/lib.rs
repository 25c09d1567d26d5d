//! Loadlag engine crate.
//!
//! Measures UI-thread responsiveness while a page loads: a navigation is
//! issued through an injected [`host::Navigator`], then a fixed-interval
//! timer is re-armed for as long as the page reports loading, and every
//! positive overshoot of that timer is recorded into a [`report::ReportSink`].
//!
//! The sampler itself is a plain state machine ([`sampler::LagSampler`]);
//! [`runtime`] drives it with real tokio timers.

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod sampler;
pub mod time;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{SamplerTiming, Target};
pub use error::{NavigationError, SamplerError};
pub use sampler::{AbortReason, LagSampler, SamplerEvent, SamplerState};
