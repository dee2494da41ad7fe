//! Automatic house deal.
//!
//! The [`AutoDealer`] is a tokio task that polls the table on a fixed
//! interval. When every player has been dealt and the house has not, it
//! announces the house deal, waits a settle delay, and queues the house
//! hand on the worker. The house deal runs in its own task so polling
//! carries on meanwhile; a busy flag keeps a second house deal from being
//! triggered before the first has finished.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::worker::TableHandle;
use crate::core::config::TableConfig;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Poll and settle timings for an [`AutoDealer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoDealTiming {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub settle_delay: Duration,
    pub deal_delay_ms: u64,
}

impl AutoDealTiming {
    /// Poll period, never shorter than one millisecond.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }
}

impl From<&TableConfig> for AutoDealTiming {
    fn from(config: &TableConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.poll_initial_delay_ms),
            interval: Duration::from_millis(config.poll_interval_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            deal_delay_ms: config.deal_delay_ms,
        }
    }
}

/// Background task that deals the house once everyone else is dealt.
///
/// Dropping the dealer stops polling. A house deal already queued on the
/// worker still completes.
#[derive(Debug)]
pub struct AutoDealer {
    task: JoinHandle<()>,
    busy: Arc<AtomicBool>,
}

impl AutoDealer {
    /// Start polling with timings taken from `config`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(handle: TableHandle, config: &TableConfig) -> Self {
        Self::with_timing(handle, AutoDealTiming::from(config))
    }

    /// Must be called from within a tokio runtime. A zero interval polls
    /// every millisecond.
    #[must_use]
    pub fn with_timing(handle: TableHandle, timing: AutoDealTiming) -> Self {
        let busy = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(poll(handle, timing, Arc::clone(&busy)));
        Self { task, busy }
    }

    /// Whether a house deal is pending or in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Whether the poll loop is still running. It ends once the worker closes.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for AutoDealer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll(handle: TableHandle, timing: AutoDealTiming, busy: Arc<AtomicBool>) {
    let mut ticks = time::interval_at(Instant::now() + timing.initial_delay, timing.period());
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        if busy.load(Ordering::Acquire) {
            continue;
        }

        match handle.house_ready_async().await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(_) => {
                debug!("Table worker closed, auto dealer stopping");
                break;
            }
        }

        if busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            continue;
        }
        if !announce(&handle, &busy) {
            break;
        }
        tokio::spawn(deal_house(handle.clone(), timing, Arc::clone(&busy)));
    }
}

// Releases the busy flag when the worker is gone.
fn announce(handle: &TableHandle, busy: &AtomicBool) -> bool {
    if let Err(e) = handle.post_status("The house is dealing shortly") {
        debug!("Auto dealer stopping: {e}");
        busy.store(false, Ordering::Release);
        return false;
    }
    true
}

async fn deal_house(handle: TableHandle, timing: AutoDealTiming, busy: Arc<AtomicBool>) {
    time::sleep(timing.settle_delay).await;

    let delay_ms = timing.deal_delay_ms;
    // Re-checked on the worker so a manual house deal in the meantime wins.
    let result = handle
        .with_async(move |table| {
            if !table.house_ready() {
                return None;
            }
            table.publish_status("The house is dealing now");
            Some(table.deal_house(delay_ms))
        })
        .await;

    match result {
        Ok(Some(Ok(outcome))) => info!("Auto dealer dealt the house: {}", outcome.score),
        Ok(Some(Err(e))) => warn!("Auto dealer could not deal the house: {e}"),
        Ok(None) => debug!("House no longer ready, auto deal skipped"),
        Err(e) => warn!("Auto dealer lost the table: {e}"),
    }
    busy.store(false, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::worker::TableWorker;
    use crate::table::Table;

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut timing = AutoDealTiming::from(&TableConfig::default());
        assert_eq!(timing.period(), Duration::from_millis(1000));
        timing.interval = Duration::ZERO;
        assert_eq!(timing.period(), MIN_INTERVAL);
    }

    #[test]
    fn test_announce_on_closed_worker_releases_busy() {
        let worker = TableWorker::spawn(Table::new(TableConfig::default()).unwrap()).unwrap();
        let handle = worker.handle();
        let busy = AtomicBool::new(true);
        assert!(announce(&handle, &busy));
        assert!(busy.load(Ordering::Acquire));

        worker.shutdown();
        assert!(!announce(&handle, &busy));
        assert!(!busy.load(Ordering::Acquire));
    }
}
