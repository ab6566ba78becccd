//! # Region Scheduler
//!
//! Every cached region runs two kinds of task on the cache's tokio runtime:
//!
//! - a **ticker** firing every `tick_interval`, which advances all resident
//!   entities and arms an eviction when no player is present;
//! - at most one pending **eviction**, which sleeps for the idle grace
//!   period and then removes the region from the cache unless a player
//!   arrived in the meantime.
//!
//! ## Handles
//!
//! Both are owned by the region as [`AbortHandle`]s in [`RegionTasks`].
//! Cancelling an eviction aborts its task *and* clears its token, so an
//! eviction that already woke up and is waiting on a lock still sees that it
//! lost and backs off.
//!
//! Tasks hold only weak references. Dropping the cache or the region ends
//! them at their next wake-up.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

use crate::cache::CacheInner;
use crate::region::Region;

/// Tick timing statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStats {
    /// Minimum tick duration observed.
    pub min_tick_us: u64,
    /// Maximum tick duration observed.
    pub max_tick_us: u64,
    /// Average tick duration (rolling).
    pub avg_tick_us: u64,
    /// Number of late ticks (took longer than budget).
    pub late_ticks: u64,
    /// Total ticks measured.
    pub total_ticks: u64,
}

impl Default for TickStats {
    fn default() -> Self {
        Self {
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            avg_tick_us: 0,
            late_ticks: 0,
            total_ticks: 0,
        }
    }
}

impl TickStats {
    /// Records one tick that took `elapsed` against a `budget`.
    pub fn record(&mut self, elapsed: Duration, budget: Duration) {
        let elapsed_us = elapsed.as_micros() as u64;

        self.min_tick_us = self.min_tick_us.min(elapsed_us);
        self.max_tick_us = self.max_tick_us.max(elapsed_us);
        self.avg_tick_us = if self.total_ticks == 0 {
            elapsed_us
        } else {
            (self.avg_tick_us * 15 + elapsed_us) / 16
        };
        self.total_ticks += 1;

        if elapsed > budget {
            self.late_ticks += 1;
        }
    }
}

/// A scheduled idle eviction.
#[derive(Debug)]
struct PendingEviction {
    token: u64,
    handle: AbortHandle,
}

/// Scheduled-task handles owned by a region.
#[derive(Debug, Default)]
pub struct RegionTasks {
    ticker: Option<AbortHandle>,
    eviction: Option<PendingEviction>,
}

impl RegionTasks {
    /// Installs the ticker handle, aborting any previous one.
    pub fn set_ticker(&mut self, handle: AbortHandle) {
        if let Some(old) = self.ticker.replace(handle) {
            old.abort();
        }
    }

    /// Whether a ticker is installed.
    #[must_use]
    pub const fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Installs a pending eviction, aborting any previous one.
    pub fn set_eviction(&mut self, token: u64, handle: AbortHandle) {
        if let Some(old) = self.eviction.replace(PendingEviction { token, handle }) {
            old.handle.abort();
        }
    }

    /// Token of the pending eviction, if any.
    #[must_use]
    pub fn eviction_token(&self) -> Option<u64> {
        self.eviction.as_ref().map(|pending| pending.token)
    }

    /// Cancels the pending eviction. Returns whether one was pending.
    pub fn cancel_eviction(&mut self) -> bool {
        match self.eviction.take() {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forgets the pending eviction without aborting it. Used by the
    /// eviction task itself once it has won.
    pub fn clear_eviction(&mut self) {
        self.eviction = None;
    }

    /// Aborts everything.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.cancel_eviction();
    }
}

/// Starts the ticker for a freshly published region.
pub(crate) fn start_ticker(cache: &Arc<CacheInner>, region: &Arc<Mutex<Region>>) {
    let period = cache.config().tick_interval();
    let task = run_ticker(
        Arc::downgrade(cache),
        Arc::downgrade(region),
        period,
    );
    let handle = cache.runtime().spawn(task).abort_handle();
    region.lock().tasks_mut().set_ticker(handle);
}

async fn run_ticker(cache: Weak<CacheInner>, region: Weak<Mutex<Region>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;
    let mut last = tokio::time::Instant::now();

    loop {
        interval.tick().await;
        let (Some(cache), Some(region)) = (cache.upgrade(), region.upgrade()) else {
            break;
        };

        let now = tokio::time::Instant::now();
        let dt = now - last;
        last = now;

        let mut guard = region.lock();
        let started = Instant::now();
        let has_players = guard.tick(dt);
        guard.record_tick(started.elapsed(), period);

        if !has_players && guard.tasks().eviction_token().is_none() {
            let token = cache.next_eviction_token();
            let task = evict_after(
                Arc::downgrade(&cache),
                Arc::downgrade(&region),
                guard.id().to_owned(),
                token,
                cache.config().idle_grace(),
            );
            let handle = cache.runtime().spawn(task).abort_handle();
            guard.tasks_mut().set_eviction(token, handle);
            tracing::debug!(region = %guard.id(), token, "idle, eviction scheduled");
        }
    }
}

async fn evict_after(
    cache: Weak<CacheInner>,
    region: Weak<Mutex<Region>>,
    id: String,
    token: u64,
    grace: Duration,
) {
    tokio::time::sleep(grace).await;
    if let (Some(cache), Some(region)) = (cache.upgrade(), region.upgrade()) {
        cache.evict_if_idle(&id, &region, token);
    }
}
