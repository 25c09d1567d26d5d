use std::time::Duration;

use super::{LoadLagReport, ReportSink};

/// Benchmark controller owning the report of the measurement in flight.
///
/// `next_test` archives the current report and starts an empty one, so a
/// single frontend can sit behind several consecutive samplers.
#[derive(Debug, Default)]
pub struct Frontend {
    report: LoadLagReport,
    completed: Vec<LoadLagReport>,
}

impl Frontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report of the measurement currently in progress.
    pub fn report(&self) -> &LoadLagReport {
        &self.report
    }

    /// Labels the in-flight report with the URL being measured.
    pub fn begin(&mut self, url: impl Into<String>) {
        self.report.url = Some(url.into());
    }

    /// Reports of every measurement that reached `next_test`, oldest first.
    pub fn completed(&self) -> &[LoadLagReport] {
        &self.completed
    }

    /// Drops the in-flight report of a measurement that will never reach
    /// `next_test`, returning what it had collected.
    pub fn abandon(&mut self) -> LoadLagReport {
        std::mem::take(&mut self.report)
    }

    pub fn into_completed(self) -> Vec<LoadLagReport> {
        self.completed
    }
}

impl ReportSink for Frontend {
    fn record_lag(&mut self, overshoot: Duration) {
        self.report.loadlag.push(overshoot);
    }

    fn load_finished(&mut self, elapsed: Duration) {
        self.report.load_time = Some(elapsed);
    }

    fn next_test(&mut self) {
        let report = std::mem::take(&mut self.report);
        log::info!(
            "measurement {} complete: {} lag samples",
            self.completed.len() + 1,
            report.loadlag.len()
        );
        self.completed.push(report);
    }
}
