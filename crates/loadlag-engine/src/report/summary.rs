use std::time::Duration;

use serde::Serialize;

use super::LoadLagReport;
use crate::time::millis_f64;

/// Aggregate view over a `loadlag` sequence, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LagSummary {
    pub count: usize,
    pub total_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub max_ms: f64,
    pub responsiveness: f64,
}

impl LagSummary {
    /// Summarizes `samples`. An empty slice yields all zeros.
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut ms: Vec<f64> = samples.iter().copied().map(millis_f64).collect();
        ms.sort_by(f64::total_cmp);

        let count = ms.len();
        let total_ms: f64 = ms.iter().sum();
        let mid = count / 2;
        let median_ms = if count % 2 == 0 {
            (ms[mid - 1] + ms[mid]) / 2.0
        } else {
            ms[mid]
        };

        Self {
            count,
            total_ms,
            mean_ms: total_ms / count as f64,
            median_ms,
            max_ms: ms[count - 1],
            responsiveness: responsiveness(samples),
        }
    }
}

/// Harness responsiveness metric: `round(sum(ms^2 / 1e6))` over
/// whole-millisecond samples.
///
/// Squaring weights long stalls far above many short ones.
pub fn responsiveness(samples: &[Duration]) -> f64 {
    samples
        .iter()
        .map(|d| {
            let ms = d.as_millis() as f64;
            ms * ms / 1_000_000.0
        })
        .sum::<f64>()
        .round()
}

/// JSON-ready record of one measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub url: Option<String>,
    pub load_time_ms: Option<f64>,
    pub loadlag_ms: Vec<f64>,
    pub summary: LagSummary,
}

impl MeasurementRecord {
    pub fn from_report(report: &LoadLagReport) -> Self {
        Self {
            url: report.url.clone(),
            load_time_ms: report.load_time.map(millis_f64),
            loadlag_ms: report.loadlag.iter().copied().map(millis_f64).collect(),
            summary: report.summary(),
        }
    }
}
