//! Measurement configuration: where to navigate and how to time the probe.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public page loaded when no harness web server is in play.
pub const FALLBACK_URL: &str = "http://www.iol.co.za";

/// Page path served by the harness web server in instrumented mode.
pub const INSTRUMENTED_PATH: &str = "/startup_test/fennecmark/wikipedia.html";

/// Web server assumed when instrumented mode is requested without a host.
pub const DEFAULT_WEB_SERVER: &str = "localhost";

/// Nominal interval of each sampling tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between load completion and `next_test`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(5000);

/// Navigation target of one measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Target {
    /// Page served by the harness's own web server.
    Instrumented { web_server: String },
    /// Fixed public page.
    Fallback,
}

impl Target {
    /// Builds a target from the harness flags.
    ///
    /// `web_server` is only consulted in instrumented mode.
    pub fn from_flags(instrumented: bool, web_server: Option<&str>) -> Self {
        if instrumented {
            Target::Instrumented {
                web_server: web_server.unwrap_or(DEFAULT_WEB_SERVER).to_string(),
            }
        } else {
            Target::Fallback
        }
    }

    /// Resolves the URL to navigate to.
    ///
    /// The host string is spliced in verbatim; a malformed host yields a
    /// malformed URL and it is up to the navigator to reject it.
    pub fn resolve_url(&self) -> String {
        match self {
            Target::Instrumented { web_server } => {
                format!("http://{web_server}{INSTRUMENTED_PATH}")
            }
            Target::Fallback => FALLBACK_URL.to_string(),
        }
    }

    pub fn is_instrumented(&self) -> bool {
        matches!(self, Target::Instrumented { .. })
    }
}

/// Timer constants used by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerTiming {
    /// Nominal delay of every sampling timer.
    pub tick_interval: Duration,
    /// Delay between the first not-loading check and `next_test`.
    pub settle_delay: Duration,
    /// Give up on a page still loading after this long. `None` samples
    /// for as long as the page loads.
    pub load_deadline: Option<Duration>,
}

impl Default for SamplerTiming {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            load_deadline: None,
        }
    }
}

impl SamplerTiming {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_load_deadline(mut self, deadline: Duration) -> Self {
        self.load_deadline = Some(deadline);
        self
    }
}
