use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::host::{TimerHost, TimerId};
use crate::time::MonotonicClock;

/// Receiving end of a [`TokioTimerHost`]: yields handles as timers fire.
#[derive(Debug)]
pub struct TimerEvents {
    rx: mpsc::UnboundedReceiver<TimerId>,
}

impl TimerEvents {
    /// Next fired handle. `None` once the host has been dropped and every
    /// in-flight timer has resolved.
    pub async fn recv(&mut self) -> Option<TimerId> {
        self.rx.recv().await
    }
}

/// [`TimerHost`] arming one `tokio::time::sleep` task per timer.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTimerHost {
    clock: MonotonicClock,
    next_id: u64,
    pending: HashMap<TimerId, JoinHandle<()>>,
    fired: mpsc::UnboundedSender<TimerId>,
}

impl TokioTimerHost {
    pub fn new() -> (Self, TimerEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Self {
            clock: MonotonicClock::new(),
            next_id: 0,
            pending: HashMap::new(),
            fired: tx,
        };
        (host, TimerEvents { rx })
    }

    /// Timers armed and not yet fired or cleared.
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }
}

impl TimerHost for TokioTimerHost {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.pending.retain(|_, h| !h.is_finished());

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let tx = self.fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the measurement loop is over.
            let _ = tx.send(id);
        });
        self.pending.insert(id, handle);
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        if let Some(handle) = self.pending.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioTimerHost {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
