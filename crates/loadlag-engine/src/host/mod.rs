//! Host contracts consumed by the sampler.
//!
//! The sampler never touches a browser or an OS timer directly. Both are
//! injected at construction so a test double can stand in for either.

use std::time::Duration;

use crate::error::NavigationError;

/// Opaque handle to an armed one-shot timer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerId(pub u64);

/// Browser control surface of the active view.
pub trait Navigator {
    /// Starts loading `url` into the active view.
    fn load_url(&mut self, url: &str) -> Result<(), NavigationError>;

    /// Whether the active view is still loading.
    fn is_loading(&self) -> bool;
}

/// One-shot timer facility plus the clock it measures against.
pub trait TimerHost {
    /// Monotonic time since the host's origin.
    fn now(&self) -> Duration;

    /// Arms a one-shot timer. The host later delivers the returned handle
    /// back to the sampler as a `TimerFired` event.
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Disarms a pending timer. Unknown or already-fired handles are ignored.
    fn clear_timeout(&mut self, id: TimerId);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn load_url(&mut self, url: &str) -> Result<(), NavigationError> {
        (**self).load_url(url)
    }

    fn is_loading(&self) -> bool {
        (**self).is_loading()
    }
}
