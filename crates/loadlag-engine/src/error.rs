use std::fmt;

use crate::sampler::SamplerState;

/// A navigation request rejected by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    pub url: String,
    pub reason: String,
}

impl NavigationError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { url: url.into(), reason: reason.into() }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation to {} failed: {}", self.url, self.reason)
    }
}

impl std::error::Error for NavigationError {}

/// Errors surfaced by [`LagSampler`](crate::sampler::LagSampler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    /// The host refused the navigation. Never caught by the sampler.
    Navigation(NavigationError),
    /// `start` was called on a sampler that already left `Idle`.
    AlreadyStarted { state: SamplerState },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerError::Navigation(e) => write!(f, "{e}"),
            SamplerError::AlreadyStarted { state } => {
                write!(f, "sampler already started (state: {})", state.name())
            }
        }
    }
}

impl std::error::Error for SamplerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplerError::Navigation(e) => Some(e),
            SamplerError::AlreadyStarted { .. } => None,
        }
    }
}

impl From<NavigationError> for SamplerError {
    fn from(e: NavigationError) -> Self {
        SamplerError::Navigation(e)
    }
}
