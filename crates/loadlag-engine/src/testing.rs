//! Deterministic host doubles.
//!
//! [`ScriptedNavigator`] reports loading for a fixed number of polls and
//! [`ManualTimers`] only moves time when told to, so sampler transitions can
//! be stepped one at a time.

use std::cell::Cell;
use std::time::Duration;

use crate::error::NavigationError;
use crate::host::{Navigator, TimerHost, TimerId};

/// Navigator whose `is_loading` is true for the first `loading_polls` calls.
#[derive(Debug, Default)]
pub struct ScriptedNavigator {
    loading_polls: usize,
    polls: Cell<usize>,
    loaded: Vec<String>,
    fail_with: Option<String>,
}

impl ScriptedNavigator {
    pub fn loading_for(polls: usize) -> Self {
        Self { loading_polls: polls, ..Self::default() }
    }

    /// Navigator that never finishes loading.
    pub fn stuck() -> Self {
        Self::loading_for(usize::MAX)
    }

    /// Navigator that rejects every `load_url` with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { fail_with: Some(reason.into()), ..Self::default() }
    }

    /// URLs passed to `load_url`, in order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Number of `is_loading` queries answered so far.
    pub fn polls(&self) -> usize {
        self.polls.get()
    }
}

impl Navigator for ScriptedNavigator {
    fn load_url(&mut self, url: &str) -> Result<(), NavigationError> {
        if let Some(reason) = &self.fail_with {
            return Err(NavigationError::new(url, reason.clone()));
        }
        self.loaded.push(url.to_string());
        Ok(())
    }

    fn is_loading(&self) -> bool {
        let n = self.polls.get();
        self.polls.set(n.saturating_add(1));
        n < self.loading_polls
    }
}

/// An armed timer as seen by [`ManualTimers`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ArmedTimer {
    pub id: TimerId,
    pub delay: Duration,
    pub armed_at: Duration,
}

/// Timer host with a hand-advanced clock. Nothing fires on its own.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    armed: Vec<ArmedTimer>,
    cleared: Vec<TimerId>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Every timer ever armed, oldest first.
    pub fn armed(&self) -> &[ArmedTimer] {
        &self.armed
    }

    pub fn last_armed(&self) -> Option<ArmedTimer> {
        self.armed.last().copied()
    }

    pub fn cleared(&self) -> &[TimerId] {
        &self.cleared
    }

    /// How many armed timers used exactly `delay`.
    pub fn armed_with_delay(&self, delay: Duration) -> usize {
        self.armed.iter().filter(|t| t.delay == delay).count()
    }
}

impl TimerHost for ManualTimers {
    fn now(&self) -> Duration {
        self.now
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed.push(ArmedTimer { id, delay, armed_at: self.now });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.cleared.push(id);
    }
}
