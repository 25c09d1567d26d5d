use loadlag_engine::report::{LoadLagReport, MeasurementRecord};

use crate::cli::OutputFormat;

/// Renders completed measurements in the requested format.
pub fn render(reports: &[LoadLagReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let records: Vec<MeasurementRecord> =
                reports.iter().map(LoadLagReport::record).collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
        OutputFormat::Text => Ok(reports
            .iter()
            .enumerate()
            .map(|(i, r)| text_line(i + 1, r))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn text_line(run: usize, report: &LoadLagReport) -> String {
    let s = report.summary();
    let load = match report.load_time {
        Some(d) => format!("{:.1} ms", d.as_secs_f64() * 1000.0),
        None => "n/a".to_string(),
    };
    format!(
        concat!(
            "run {run}: {url}  load {load}  samples {count}  ",
            "mean {mean:.2} ms  median {median:.2} ms  max {max:.2} ms  responsiveness {resp}",
        ),
        run = run,
        url = report.url.as_deref().unwrap_or("?"),
        load = load,
        count = s.count,
        mean = s.mean_ms,
        median = s.median_ms,
        max = s.max_ms,
        resp = s.responsiveness,
    )
}
