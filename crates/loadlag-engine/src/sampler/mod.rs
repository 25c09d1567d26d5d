//! Lag-during-load sampler.
//!
//! After issuing the navigation the sampler repeatedly asks the host whether
//! the page is still loading. While it is, a timer of `tick_interval` is
//! armed; when it fires, the amount by which it fired late is recorded if
//! positive and the loading check repeats. Once loading ends, a single
//! `settle_delay` timer is armed and its firing calls `next_test`.
//!
//! Exactly one timer is pending at any time, so ticks resolve in order.

mod state;

use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::config::{SamplerTiming, Target};
use crate::error::SamplerError;
use crate::host::{Navigator, TimerHost, TimerId};
use crate::report::ReportSink;

pub use state::{AbortReason, SamplerEvent, SamplerState};

pub struct LagSampler<N, T, R> {
    navigator: N,
    timers: T,
    sink: R,
    timing: SamplerTiming,
    state: SamplerState,
    url: Option<String>,
    navigated_at: Duration,
    load_reported: bool,
}

impl<N, T, R> LagSampler<N, T, R>
where
    N: Navigator,
    T: TimerHost,
    R: ReportSink,
{
    pub fn new(navigator: N, timers: T, sink: R) -> Self {
        Self::with_timing(navigator, timers, sink, SamplerTiming::default())
    }

    pub fn with_timing(navigator: N, timers: T, sink: R, timing: SamplerTiming) -> Self {
        Self {
            navigator,
            timers,
            sink,
            timing,
            state: SamplerState::Idle,
            url: None,
            navigated_at: Duration::ZERO,
            load_reported: false,
        }
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Navigates to `target` and begins sampling.
    pub fn start(&mut self, target: &Target) -> Result<SamplerState, SamplerError> {
        self.dispatch(SamplerEvent::Start(target))
    }

    /// Delivers a fired timer handle.
    pub fn on_timer(&mut self, id: TimerId) -> Result<SamplerState, SamplerError> {
        self.dispatch(SamplerEvent::TimerFired(id))
    }

    /// Aborts the measurement, disarming whatever timer is pending.
    pub fn stop(&mut self) -> SamplerState {
        // Stop never fails.
        match self.dispatch(SamplerEvent::Stop) {
            Ok(state) => state,
            Err(_) => self.state,
        }
    }

    /// Applies one event and returns the resulting state.
    pub fn dispatch(&mut self, event: SamplerEvent<'_>) -> Result<SamplerState, SamplerError> {
        match (self.state, event) {
            (SamplerState::Idle, SamplerEvent::Start(target)) => self.navigate(target)?,
            (state, SamplerEvent::Start(_)) => {
                return Err(SamplerError::AlreadyStarted { state });
            }

            (SamplerState::Sampling { tick_start, timer }, SamplerEvent::TimerFired(id))
                if id == timer =>
            {
                self.record_tick(tick_start);
                self.schedule_next_event();
            }
            (SamplerState::Settling { timer }, SamplerEvent::TimerFired(id)) if id == timer => {
                self.transition(SamplerState::Done);
                info!("settled after load of {}", self.url.as_deref().unwrap_or("?"));
                self.sink.next_test();
            }
            (state, SamplerEvent::TimerFired(id)) => {
                trace!("ignoring timer {id:?} in state {}", state.name());
            }

            (state, SamplerEvent::Stop) if state.is_terminal() => {}
            (_, SamplerEvent::Stop) => self.abort(AbortReason::Stopped),
        }
        Ok(self.state)
    }

    // ── transitions ───────────────────────────────────────────────────────

    fn navigate(&mut self, target: &Target) -> Result<(), SamplerError> {
        let url = target.resolve_url();
        self.transition(SamplerState::Navigating);
        info!("navigating to {url}");

        if let Err(e) = self.navigator.load_url(&url) {
            self.transition(SamplerState::Idle);
            return Err(e.into());
        }

        self.navigated_at = self.timers.now();
        self.url = Some(url);
        self.schedule_next_event();
        Ok(())
    }

    fn schedule_next_event(&mut self) {
        let now = self.timers.now();

        if !self.navigator.is_loading() {
            if !self.load_reported {
                self.load_reported = true;
                self.sink.load_finished(now.saturating_sub(self.navigated_at));
            }
            let timer = self.timers.set_timeout(self.timing.settle_delay);
            self.transition(SamplerState::Settling { timer });
            return;
        }

        if let Some(deadline) = self.timing.load_deadline {
            let loading_for = now.saturating_sub(self.navigated_at);
            if loading_for >= deadline {
                warn!(
                    "{} still loading after {loading_for:?}; giving up",
                    self.url.as_deref().unwrap_or("?")
                );
                self.abort(AbortReason::LoadDeadline);
                return;
            }
        }

        let timer = self.timers.set_timeout(self.timing.tick_interval);
        self.transition(SamplerState::Sampling { tick_start: now, timer });
    }

    fn record_tick(&mut self, tick_start: Duration) {
        let elapsed = self.timers.now().saturating_sub(tick_start);
        // Early or exactly on-time ticks carry no lag.
        match elapsed.checked_sub(self.timing.tick_interval) {
            Some(overshoot) if !overshoot.is_zero() => {
                trace!("tick overshoot {overshoot:?}");
                self.sink.record_lag(overshoot);
            }
            _ => {}
        }
    }

    fn abort(&mut self, reason: AbortReason) {
        if let Some(timer) = self.state.pending_timer() {
            self.timers.clear_timeout(timer);
        }
        self.transition(SamplerState::Aborted(reason));
    }

    fn transition(&mut self, next: SamplerState) {
        if self.state.name() != next.name() {
            debug!("sampler {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }
}

impl<N, T, R> LagSampler<N, T, R> {
    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// URL of the navigation, once `start` succeeded.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn timing(&self) -> &SamplerTiming {
        &self.timing
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests;
