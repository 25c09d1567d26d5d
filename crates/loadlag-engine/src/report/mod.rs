//! Reporting sink.
//!
//! The sampler appends overshoot samples to a [`ReportSink`] and calls
//! [`ReportSink::next_test`] once the measurement has settled. [`Frontend`]
//! is the stock sink: a benchmark controller owning one [`LoadLagReport`].

mod frontend;
mod summary;

use std::time::Duration;

pub use frontend::Frontend;
pub use summary::{responsiveness, LagSummary, MeasurementRecord};

/// Receiver of sampler output.
pub trait ReportSink {
    /// Appends one strictly positive overshoot to the `loadlag` sequence.
    fn record_lag(&mut self, overshoot: Duration);

    /// The page stopped loading `elapsed` after the navigation was issued.
    fn load_finished(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }

    /// Proceed to the next measurement. Called once per completed run.
    fn next_test(&mut self);
}

impl<R: ReportSink + ?Sized> ReportSink for &mut R {
    fn record_lag(&mut self, overshoot: Duration) {
        (**self).record_lag(overshoot)
    }

    fn load_finished(&mut self, elapsed: Duration) {
        (**self).load_finished(elapsed)
    }

    fn next_test(&mut self) {
        (**self).next_test()
    }
}

/// Samples of one load measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadLagReport {
    /// URL the measurement navigated to, once known.
    pub url: Option<String>,
    /// Overshoot samples in the order they were taken.
    pub loadlag: Vec<Duration>,
    /// Navigation-to-idle time, if the page finished loading.
    pub load_time: Option<Duration>,
}

impl LoadLagReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.loadlag.is_empty()
    }

    pub fn summary(&self) -> LagSummary {
        LagSummary::from_samples(&self.loadlag)
    }

    /// Serializable snapshot of this report.
    pub fn record(&self) -> MeasurementRecord {
        MeasurementRecord::from_report(self)
    }
}
