//! Interval polling with teardown guarding.
//!
//! A poll loop runs its fetch immediately and then on every tick. Ticks do
//! not wait for the previous fetch: a slow fetch may overlap the next one.
//! Once the handle is deactivated, results of fetches still in flight are
//! dropped instead of applied.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Spawns poll loops at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
}

impl Poller {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling. `fetch` runs on every tick; `apply` receives each
    /// result while the returned handle is still active.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F, Fut, T, A>(&self, fetch: F, apply: A) -> PollHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        A: Fn(T) + Send + Sync + 'static,
    {
        let active = Arc::new(RwLock::new(true));
        let fetch = Arc::new(fetch);
        let apply = Arc::new(apply);
        let period = self.interval;

        let gate = Arc::clone(&active);
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick: u64 = 0;
            loop {
                ticker.tick().await;
                tick += 1;
                trace!(tick, "Poll tick");

                let pending = fetch();
                let gate = Arc::clone(&gate);
                let apply = Arc::clone(&apply);
                // Detached: deactivation stops the loop, not fetches already sent.
                tokio::spawn(async move {
                    let value = pending.await;
                    let active = gate.read();
                    if *active {
                        apply(value);
                    } else {
                        debug!(tick, "Discarding poll result after teardown");
                    }
                });
            }
        });

        debug!(interval_ms = period.as_millis() as u64, "Poller started");
        PollHandle { active, task }
    }
}

/// Handle to a running poll loop. Dropping it deactivates the loop.
pub struct PollHandle {
    active: Arc<RwLock<bool>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop ticking and discard any result that has not been applied yet.
    ///
    /// Once this returns no further `apply` call starts.
    pub fn deactivate(&self) {
        let mut active = self.active.write();
        if *active {
            *active = false;
            self.task.abort();
            debug!("Poller deactivated");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.read()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.deactivate();
    }
}
