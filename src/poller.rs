//! Fetch cycle: manual and recurring device list refreshes.
//!
//! Each fetch runs as its own tokio task and reports back through an
//! unbounded channel of [`Update`]s. The session applies those updates on
//! its own loop, so the [`SnapshotStore`] is only ever touched from one
//! place.
//!
//! ```text
//!  request(Manual|Background)          RefreshTimer
//!          │ seq = n                        │ every interval
//!          ▼                                ▼
//!   tokio::spawn(fetch) ──▶ Update::Fetched  Update::TimerFired
//!                                 │
//!                                 ▼
//!                      Poller::complete(store, ..)
//!                      ├── stale (seq < newest applied) ─▶ dropped
//!                      ├── Ok  ─▶ store.commit() ─▶ transitions
//!                      └── Err ─▶ store untouched
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::data::{Device, DeviceId, SnapshotStore, Transition};
use crate::error::SourceError;
use crate::probe::ProbeOutcome;
use crate::source::DeviceSource;

/// Default interval between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// What started a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// User-initiated; shows the loading indicator.
    Manual,
    /// Timer-driven; silent.
    Background,
}

/// Results delivered back to the session loop.
#[derive(Debug)]
pub enum Update {
    Fetched {
        seq: u64,
        trigger: Trigger,
        result: Result<Vec<Device>, SourceError>,
    },
    Probed {
        device_id: DeviceId,
        name: String,
        outcome: ProbeOutcome,
    },
    TimerFired,
}

/// How a completed fetch affected the store.
#[derive(Debug, PartialEq)]
pub enum FetchOutcome {
    /// A newer response was already applied; this one was discarded.
    Stale,
    /// The snapshot was committed.
    Updated { transitions: Vec<Transition> },
    /// The fetch failed; the store is unchanged.
    Failed(String),
}

/// Owns the fetch cycle and the recurring refresh timer.
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn DeviceSource>,
    updates: mpsc::UnboundedSender<Update>,
    interval: Duration,
    timer: RefreshTimer,
    next_seq: u64,
    newest_applied: Option<u64>,
    manual_in_flight: usize,
}

impl Poller {
    pub fn new(
        source: Arc<dyn DeviceSource>,
        updates: mpsc::UnboundedSender<Update>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            updates,
            interval,
            timer: RefreshTimer::default(),
            next_seq: 0,
            newest_applied: None,
            manual_in_flight: 0,
        }
    }

    /// Start one fetch and return its sequence number.
    ///
    /// Concurrent requests are neither coalesced nor cancelled. Must be
    /// called from within a tokio runtime.
    pub fn request(&mut self, trigger: Trigger) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        if trigger == Trigger::Manual {
            self.manual_in_flight += 1;
        }
        debug!(seq, ?trigger, "Starting fetch");

        let source = self.source.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = source.fetch_devices().await;
            // The receiver only goes away when the session is shutting down
            let _ = updates.send(Update::Fetched { seq, trigger, result });
        });
        seq
    }

    /// Whether a user-initiated fetch is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.manual_in_flight > 0
    }

    /// Apply a finished fetch to the store.
    ///
    /// Responses older than the newest one already applied are dropped, so
    /// the newest request wins regardless of arrival order.
    pub fn complete(
        &mut self,
        store: &mut SnapshotStore,
        seq: u64,
        trigger: Trigger,
        result: Result<Vec<Device>, SourceError>,
    ) -> FetchOutcome {
        if trigger == Trigger::Manual {
            self.manual_in_flight = self.manual_in_flight.saturating_sub(1);
        }

        if self.newest_applied.is_some_and(|newest| seq < newest) {
            debug!(seq, newest = ?self.newest_applied, "Dropping stale fetch response");
            return FetchOutcome::Stale;
        }
        self.newest_applied = Some(seq);

        match result {
            Ok(devices) => {
                let count = devices.len();
                let transitions = store.commit(devices);
                info!(seq, devices = count, transitions = transitions.len(), "Snapshot updated");
                FetchOutcome::Updated { transitions }
            }
            Err(e) => {
                warn!(seq, error = %e, "Device fetch failed");
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn auto_refresh(&self) -> bool {
        self.timer.is_running()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Enable or disable recurring refreshes.
    ///
    /// Any existing timer is cancelled first, so toggling never stacks timers.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.timer.stop();
        if enabled {
            self.timer.start(self.interval, self.updates.clone());
        }
        info!(enabled, interval_secs = self.interval.as_secs(), "Auto-refresh changed");
    }
}

/// Cancellable timer that emits [`Update::TimerFired`] at a fixed interval.
#[derive(Debug, Default)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Start ticking, replacing any running timer. The first tick comes
    /// one full period after the call.
    pub fn start(&mut self, period: Duration, updates: mpsc::UnboundedSender<Update>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if updates.send(Update::TimerFired).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DeviceId, DeviceStatus};
    use crate::test_support::{device, FakeSource};

    fn poller_with(source: Arc<FakeSource>) -> (Poller, mpsc::UnboundedReceiver<Update>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Poller::new(source, tx, DEFAULT_REFRESH_INTERVAL), rx)
    }

    async fn next_fetch(
        rx: &mut mpsc::UnboundedReceiver<Update>,
    ) -> (u64, Trigger, Result<Vec<Device>, SourceError>) {
        loop {
            match rx.recv().await.expect("channel open") {
                Update::Fetched { seq, trigger, result } => return (seq, trigger, result),
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn test_request_issues_one_fetch() {
        let source = Arc::new(FakeSource::new());
        source.push_fetch(Ok(vec![device(1, "a", "10.0.0.1", DeviceStatus::Up)]));
        let (mut poller, mut rx) = poller_with(source.clone());

        let seq = poller.request(Trigger::Manual);
        assert!(poller.is_loading());

        let (got_seq, trigger, result) = next_fetch(&mut rx).await;
        assert_eq!(got_seq, seq);
        assert_eq!(trigger, Trigger::Manual);
        assert_eq!(result.unwrap().len(), 1);
        assert_eq!(source.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_background_fetch_does_not_show_loading() {
        let source = Arc::new(FakeSource::new());
        source.push_fetch(Ok(vec![]));
        let (mut poller, _rx) = poller_with(source);

        poller.request(Trigger::Background);
        assert!(!poller.is_loading());
    }

    #[test]
    fn test_complete_commits_and_reports_transitions() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(Arc::new(FakeSource::new()), tx, DEFAULT_REFRESH_INTERVAL);
        let mut store = SnapshotStore::new();

        let first = poller.complete(
            &mut store,
            0,
            Trigger::Background,
            Ok(vec![device(1, "a", "10.0.0.1", DeviceStatus::Up)]),
        );
        assert_eq!(first, FetchOutcome::Updated { transitions: vec![] });

        let second = poller.complete(
            &mut store,
            1,
            Trigger::Background,
            Ok(vec![device(1, "a", "10.0.0.1", DeviceStatus::Down)]),
        );
        let FetchOutcome::Updated { transitions } = second else {
            panic!("expected update");
        };
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].is_alert());
        assert_eq!(store.prior_status_of(DeviceId(1)), Some(DeviceStatus::Down));
    }

    #[test]
    fn test_failure_leaves_store_untouched() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(Arc::new(FakeSource::new()), tx, DEFAULT_REFRESH_INTERVAL);
        let mut store = SnapshotStore::new();
        store.commit(vec![device(1, "a", "10.0.0.1", DeviceStatus::Up)]);
        let revision = store.revision();

        let outcome = poller.complete(
            &mut store,
            0,
            Trigger::Manual,
            Err(SourceError::Http { status: 500 }),
        );
        assert_eq!(outcome, FetchOutcome::Failed("HTTP 500".to_string()));
        assert_eq!(store.revision(), revision);
        assert_eq!(store.devices().len(), 1);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(Arc::new(FakeSource::new()), tx, DEFAULT_REFRESH_INTERVAL);
        let mut store = SnapshotStore::new();

        let newer = poller.complete(
            &mut store,
            5,
            Trigger::Background,
            Ok(vec![device(1, "new", "10.0.0.1", DeviceStatus::Up)]),
        );
        assert!(matches!(newer, FetchOutcome::Updated { .. }));

        let older = poller.complete(
            &mut store,
            4,
            Trigger::Background,
            Ok(vec![device(1, "old", "10.0.0.1", DeviceStatus::Down)]),
        );
        assert_eq!(older, FetchOutcome::Stale);
        assert_eq!(store.devices()[0].name, "new");

        // Stale failures are dropped too
        let stale_err =
            poller.complete(&mut store, 3, Trigger::Background, Err(SourceError::Timeout));
        assert_eq!(stale_err, FetchOutcome::Stale);
    }

    #[tokio::test]
    async fn test_stale_manual_fetch_still_clears_loading() {
        let source = Arc::new(FakeSource::new());
        source.push_fetch(Ok(vec![]));
        source.push_fetch(Ok(vec![]));
        let (mut poller, mut rx) = poller_with(source);
        let mut store = SnapshotStore::new();

        let first = poller.request(Trigger::Manual);
        let second = poller.request(Trigger::Manual);
        assert!(poller.is_loading());

        poller.complete(&mut store, second, Trigger::Manual, Ok(vec![]));
        assert!(poller.is_loading());
        let outcome = poller.complete(&mut store, first, Trigger::Manual, Ok(vec![]));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(!poller.is_loading());

        // Drain the spawned tasks' results
        next_fetch(&mut rx).await;
        next_fetch(&mut rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_at_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RefreshTimer::default();
        timer.start(Duration::from_secs(15), tx);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(rx.try_recv(), Ok(Update::TimerFired)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenabling_never_stacks_timers() {
        let source = Arc::new(FakeSource::new());
        let (mut poller, mut rx) = poller_with(source);

        poller.set_auto_refresh(true);
        poller.set_auto_refresh(true);
        poller.set_auto_refresh(true);
        assert!(poller.auto_refresh());

        tokio::time::sleep(Duration::from_secs(31)).await;
        let mut ticks = 0;
        while let Ok(update) = rx.try_recv() {
            assert!(matches!(update, Update::TimerFired));
            ticks += 1;
        }
        assert_eq!(ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_stops_timer() {
        let source = Arc::new(FakeSource::new());
        let (mut poller, mut rx) = poller_with(source);

        poller.set_auto_refresh(true);
        poller.set_auto_refresh(false);
        assert!(!poller.auto_refresh());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
    }
}
