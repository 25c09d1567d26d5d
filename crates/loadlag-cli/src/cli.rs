use std::time::Duration;

use clap::{Parser, ValueEnum};

use loadlag_engine::config::{DEFAULT_WEB_SERVER, SamplerTiming, Target};

/// Measure how late a 100 ms timer fires while a page loads.
#[derive(Debug, Parser)]
#[command(name = "loadlag", version)]
pub struct Args {
    /// Load the harness page from --web-server instead of the public fallback.
    #[arg(long)]
    pub instrumented: bool,

    /// Host (and optional port) serving the instrumented page.
    #[arg(long, default_value = DEFAULT_WEB_SERVER)]
    pub web_server: String,

    /// Number of consecutive measurements.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Nominal sampling interval.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_interval_ms: u64,

    /// Pause after load completion before the next measurement.
    #[arg(long, default_value_t = 5000)]
    pub settle_ms: u64,

    /// Abandon a measurement whose page is still loading after this long.
    #[arg(long)]
    pub load_timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn target(&self) -> Target {
        Target::from_flags(self.instrumented, Some(&self.web_server))
    }

    pub fn timing(&self) -> SamplerTiming {
        let timing = SamplerTiming::default()
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms))
            .with_settle_delay(Duration::from_millis(self.settle_ms));
        match self.load_timeout_secs {
            Some(secs) => timing.with_load_deadline(Duration::from_secs(secs)),
            None => timing,
        }
    }
}
