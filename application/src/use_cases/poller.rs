//! Background count poller.
//!
//! Re-reads the registration count on a fixed cadence while the form is
//! open. Reads never overlap: the next tick is scheduled only after the
//! previous read finished, and a slow read delays the following tick rather
//! than bunching missed ones together.

use super::capacity_coordinator::{CapacityCoordinator, RefreshOutcome};
use crate::config::MIN_POLL_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle to a running poller.
///
/// Dropping the handle cancels the poller; [`PollerHandle::stop`] also waits
/// for an in-flight read to be abandoned.
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawn a poller that sends each refresh result on `tx`.
///
/// The first read happens one `period` after spawning; the initial read is
/// the caller's job. A `period` below [`MIN_POLL_INTERVAL`] is raised to it.
/// The poller exits when `parent` is cancelled, the handle
/// is stopped, or the receiver is gone.
pub fn spawn_poller(
    coordinator: Arc<CapacityCoordinator>,
    period: Duration,
    parent: &CancellationToken,
    tx: mpsc::UnboundedSender<RefreshOutcome>,
) -> PollerHandle {
    let period = period.max(MIN_POLL_INTERVAL);
    let token = parent.child_token();
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("Count poller started ({:?})", period);

        loop {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                outcome = coordinator.refresh_count() => outcome,
            };
            trace!("Poll result: {:?}", outcome);

            if tx.send(outcome).is_err() {
                break;
            }
        }
        debug!("Count poller stopped");
    });

    PollerHandle {
        token,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;
    use std::sync::atomic::Ordering;

    fn setup(count: u32) -> (Arc<ScriptedGateway>, Arc<CapacityCoordinator>) {
        let gateway = Arc::new(ScriptedGateway::with_count(count));
        let coordinator = Arc::new(CapacityCoordinator::new(gateway.clone()));
        (gateway, coordinator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_each_period() {
        let (gateway, coordinator) = setup(4);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.snapshot().count(), 4);

        gateway.set_count(Ok(6));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.snapshot().count(), 6);
        assert_eq!(gateway.fetches(), 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_read_before_first_period() {
        let (gateway, coordinator) = setup(0);
        let (tx, _rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(gateway.fetches(), 0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reads_never_overlap() {
        let (gateway, coordinator) = setup(2);
        // Each read takes longer than the poll period
        gateway.set_fetch_delay(Duration::from_secs(12));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }

        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 1);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_polling() {
        let (gateway, coordinator) = setup(1);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        rx.recv().await.unwrap();
        handle.stop().await;
        let fetched = gateway.fetches();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.fetches(), fetched);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancellation_stops_poller() {
        let (gateway, coordinator) = setup(1);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let _handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        root.cancel();
        // Sender is dropped once the task exits
        assert!(rx.recv().await.is_none());
        assert_eq!(gateway.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_abandons_in_flight_read() {
        let (gateway, coordinator) = setup(1);
        gateway.set_fetch_delay(Duration::from_secs(30));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let handle = spawn_poller(coordinator, Duration::from_secs(5), &root, tx);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(gateway.fetches(), 1);
        assert!(handle.is_running());

        handle.stop().await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_polls_at_minimum_interval() {
        let (gateway, coordinator) = setup(7);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let root = CancellationToken::new();
        let started = Instant::now();
        let handle = spawn_poller(coordinator, Duration::ZERO, &root, tx);

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.snapshot().count(), 7);
        assert!(started.elapsed() >= MIN_POLL_INTERVAL);
        assert_eq!(gateway.fetches(), 1);

        handle.stop().await;
    }
}
