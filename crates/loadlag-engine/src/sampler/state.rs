use std::time::Duration;

use crate::config::Target;
use crate::host::TimerId;

/// Why a measurement ended without calling `next_test`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AbortReason {
    /// The caller asked the sampler to stop.
    Stopped,
    /// The page was still loading when the load deadline passed.
    LoadDeadline,
}

/// Sampler lifecycle.
///
/// `Idle -> Navigating -> Sampling* -> Settling -> Done`, with `Aborted`
/// reachable from any non-terminal state. `Done` and `Aborted` are final.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SamplerState {
    Idle,
    /// Navigation issued, first loading check not yet made.
    Navigating,
    /// A sampling timer is armed; `tick_start` is when it was armed.
    Sampling { tick_start: Duration, timer: TimerId },
    /// Load finished; the settle timer is armed.
    Settling { timer: TimerId },
    Done,
    Aborted(AbortReason),
}

impl SamplerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SamplerState::Done | SamplerState::Aborted(_))
    }

    /// The timer this state is waiting on, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        match *self {
            SamplerState::Sampling { timer, .. } | SamplerState::Settling { timer } => Some(timer),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SamplerState::Idle => "idle",
            SamplerState::Navigating => "navigating",
            SamplerState::Sampling { .. } => "sampling",
            SamplerState::Settling { .. } => "settling",
            SamplerState::Done => "done",
            SamplerState::Aborted(AbortReason::Stopped) => "stopped",
            SamplerState::Aborted(AbortReason::LoadDeadline) => "load-deadline",
        }
    }
}

/// Inputs to [`LagSampler::dispatch`](super::LagSampler::dispatch).
#[derive(Debug, Copy, Clone)]
pub enum SamplerEvent<'a> {
    Start(&'a Target),
    TimerFired(TimerId),
    Stop,
}
