//! Capacity Coordinator use case.
//!
//! Owns this client's view of how many teams are registered, decides whether
//! a submission may proceed, and interprets the endpoint's answer to a write.
//!
//! The client-side capacity check is advisory: it saves a wasted write and
//! gives instant feedback, but the remote sheet decides. Losing the race for
//! the last slot surfaces as [`SubmissionOutcome::RejectedCapacity`], an
//! ordinary outcome.
//!
//! # Fail-open reads
//!
//! A count read that fails for any reason leaves the last known count in
//! place and reports [`RefreshOutcome::Unchanged`]. Callers treat that as
//! "capacity remains as last seen" and never block the user on it.

use crate::ports::audit_log::{AuditEvent, AuditLog, NoAuditLog};
use crate::ports::registration_gateway::{RegistrationGateway, Submission};
use chrono::Utc;
use serde_json::json;
use signup_domain::{CEILING, CapacitySnapshot, RegistrationRecord, SubmissionOutcome};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Result of a count refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh authoritative count was applied.
    Refreshed(CapacitySnapshot),
    /// The read failed or was stale; the previous count stands.
    Unchanged(CapacitySnapshot),
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> CapacitySnapshot {
        match self {
            RefreshOutcome::Refreshed(s) | RefreshOutcome::Unchanged(s) => *s,
        }
    }

    pub fn is_refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed(_))
    }
}

#[derive(Debug, Default)]
struct CountState {
    snapshot: CapacitySnapshot,
    /// Bumped whenever a write completes; lets a read detect that it was
    /// issued before the write landed.
    write_epoch: u64,
}

/// Coordinates the shared registration counter.
///
/// Cheap to share behind an `Arc`; the internal lock is never held across
/// an `.await`.
pub struct CapacityCoordinator {
    gateway: Arc<dyn RegistrationGateway>,
    audit: Arc<dyn AuditLog>,
    state: Mutex<CountState>,
}

impl CapacityCoordinator {
    pub fn new(gateway: Arc<dyn RegistrationGateway>) -> Self {
        Self {
            gateway,
            audit: Arc::new(NoAuditLog),
            state: Mutex::new(CountState::default()),
        }
    }

    /// Create with an audit log.
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CountState> {
        // A poisoned lock only means a panic elsewhere; the count is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Latest known snapshot.
    pub fn snapshot(&self) -> CapacitySnapshot {
        self.lock().snapshot
    }

    /// True while the latest known count is below the ceiling. Never blocks
    /// on the network.
    pub fn has_capacity(&self) -> bool {
        self.snapshot().has_capacity()
    }

    /// Read the authoritative count once.
    ///
    /// A read issued before a write completed may only raise the count; a
    /// read issued after the latest write replaces it outright.
    pub async fn refresh_count(&self) -> RefreshOutcome {
        let issued_epoch = self.lock().write_epoch;

        let count = match self.gateway.fetch_count().await {
            Ok(count) => count,
            Err(e) => {
                let kept = self.snapshot();
                warn!("Count refresh failed, keeping {}: {}", kept, e);
                return RefreshOutcome::Unchanged(kept);
            }
        };

        let outcome = {
            let mut state = self.lock();
            if state.write_epoch != issued_epoch && count < state.snapshot.count() {
                debug!(
                    "Discarding stale count {} (current {})",
                    count, state.snapshot
                );
                RefreshOutcome::Unchanged(state.snapshot)
            } else {
                state.snapshot = CapacitySnapshot::new(count);
                RefreshOutcome::Refreshed(state.snapshot)
            }
        };

        if let RefreshOutcome::Refreshed(snapshot) = outcome {
            debug!("Count refreshed: {}", snapshot);
            self.audit.log(AuditEvent::new(
                "count_refreshed",
                json!({ "count": snapshot.count(), "ceiling": CEILING }),
            ));
        }
        outcome
    }

    /// Submit one validated record.
    ///
    /// Re-reads the count first, skips the write when the sheet is known to
    /// be full, and refreshes again after a write-time capacity rejection so
    /// the displayed count reflects the lost race.
    pub async fn submit(&self, record: &RegistrationRecord) -> SubmissionOutcome {
        self.audit.log(AuditEvent::new(
            "submit_attempt",
            json!({ "team": record.team_name() }),
        ));

        let outcome = self.submit_inner(record).await;

        info!("Submission for '{}': {}", record.team_name(), outcome.as_str());
        self.audit.log(AuditEvent::new(
            "submit_outcome",
            json!({
                "team": record.team_name(),
                "outcome": outcome.as_str(),
                "count": self.snapshot().count(),
            }),
        ));
        outcome
    }

    async fn submit_inner(&self, record: &RegistrationRecord) -> SubmissionOutcome {
        self.refresh_count().await;
        if !self.has_capacity() {
            debug!("Pre-check: sheet is full at {}, skipping write", self.snapshot());
            return SubmissionOutcome::RejectedCapacity;
        }

        let submission = Submission::new(record.clone(), Utc::now());
        let outcome = match self.gateway.submit(&submission).await {
            Ok(receipt) if receipt.capacity_exceeded => SubmissionOutcome::RejectedCapacity,
            Ok(receipt) if receipt.is_success() => SubmissionOutcome::Accepted,
            Ok(receipt) => {
                warn!("Submission rejected with status {}", receipt.status);
                SubmissionOutcome::rejected(format!(
                    "the registration sheet answered with status {}",
                    receipt.status
                ))
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                SubmissionOutcome::rejected(e.user_message())
            }
        };

        {
            let mut state = self.lock();
            state.write_epoch += 1;
            match outcome {
                SubmissionOutcome::Accepted => {
                    state.snapshot = state.snapshot.with_accepted();
                }
                SubmissionOutcome::RejectedCapacity => {
                    // The sheet said it is full; hold that until a read says otherwise
                    if state.snapshot.has_capacity() {
                        state.snapshot = CapacitySnapshot::new(CEILING);
                    }
                }
                SubmissionOutcome::RejectedOther { .. } => {}
            }
        }

        if outcome == SubmissionOutcome::RejectedCapacity {
            self.refresh_count().await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::registration_gateway::{GatewayError, WriteReceipt};
    use crate::testing::{ScriptedGateway, SharedSheet, valid_record};
    use std::sync::Mutex as StdMutex;

    fn coordinator(gateway: &Arc<ScriptedGateway>) -> CapacityCoordinator {
        CapacityCoordinator::new(gateway.clone())
    }

    // ==================== refresh_count ====================

    #[tokio::test]
    async fn test_refresh_applies_remote_count() {
        let gateway = Arc::new(ScriptedGateway::with_count(7));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.refresh_count().await;
        assert_eq!(outcome, RefreshOutcome::Refreshed(CapacitySnapshot::new(7)));
        assert_eq!(coordinator.snapshot().count(), 7);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_good_value() {
        let gateway = Arc::new(ScriptedGateway::with_count(12));
        let coordinator = coordinator(&gateway);
        coordinator.refresh_count().await;

        gateway.set_count(Err(GatewayError::Timeout));
        let outcome = coordinator.refresh_count().await;

        assert_eq!(outcome, RefreshOutcome::Unchanged(CapacitySnapshot::new(12)));
        assert!(coordinator.has_capacity());
    }

    #[tokio::test]
    async fn test_failed_first_refresh_fails_open() {
        let gateway = Arc::new(ScriptedGateway::with_count(0));
        gateway.set_count(Err(GatewayError::MalformedResponse("<html>".to_string())));
        let coordinator = coordinator(&gateway);

        assert!(!coordinator.refresh_count().await.is_refreshed());
        assert!(coordinator.has_capacity());
    }

    #[tokio::test]
    async fn test_has_capacity_false_at_ceiling() {
        let gateway = Arc::new(ScriptedGateway::with_count(20));
        let coordinator = coordinator(&gateway);
        coordinator.refresh_count().await;
        assert!(!coordinator.has_capacity());

        gateway.set_count(Ok(19));
        coordinator.refresh_count().await;
        assert!(coordinator.has_capacity());
    }

    #[tokio::test]
    async fn test_read_after_write_is_authoritative_even_if_lower() {
        let gateway = Arc::new(ScriptedGateway::with_count(5));
        let coordinator = coordinator(&gateway);
        coordinator.submit(&valid_record()).await;
        assert_eq!(coordinator.snapshot().count(), 6);

        // Rows were removed remotely; a read issued now replaces the count
        gateway.set_count(Ok(2));
        coordinator.refresh_count().await;
        assert_eq!(coordinator.snapshot().count(), 2);
    }

    // ==================== submit ====================

    #[tokio::test]
    async fn test_submit_accepted_increments_count() {
        let gateway = Arc::new(ScriptedGateway::with_count(19));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;

        assert_eq!(outcome, SubmissionOutcome::Accepted);
        assert_eq!(coordinator.snapshot().count(), 20);
        assert!(!coordinator.has_capacity());
        assert_eq!(gateway.submits(), 1);
    }

    #[tokio::test]
    async fn test_submit_skips_write_when_known_full() {
        let gateway = Arc::new(ScriptedGateway::with_count(20));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;

        assert_eq!(outcome, SubmissionOutcome::RejectedCapacity);
        assert_eq!(gateway.submits(), 0);
    }

    #[tokio::test]
    async fn test_submit_pre_check_uses_fresh_count() {
        let gateway = Arc::new(ScriptedGateway::with_count(3));
        let coordinator = coordinator(&gateway);
        coordinator.refresh_count().await;

        // Filled up since the form was opened
        gateway.set_count(Ok(20));
        let outcome = coordinator.submit(&valid_record()).await;

        assert_eq!(outcome, SubmissionOutcome::RejectedCapacity);
        assert_eq!(gateway.submits(), 0);
    }

    #[tokio::test]
    async fn test_submit_fails_open_when_pre_check_read_fails() {
        let gateway = Arc::new(ScriptedGateway::with_count(0));
        gateway.set_count(Err(GatewayError::ConnectionError("refused".to_string())));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;

        assert_eq!(outcome, SubmissionOutcome::Accepted);
        assert_eq!(gateway.submits(), 1);
    }

    #[tokio::test]
    async fn test_capacity_signal_wins_over_success_status() {
        let gateway = Arc::new(ScriptedGateway::with_count(19));
        gateway.set_write(Ok(WriteReceipt::new(200, true)));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;
        assert_eq!(outcome, SubmissionOutcome::RejectedCapacity);
    }

    #[tokio::test]
    async fn test_capacity_signal_wins_over_error_status() {
        let gateway = Arc::new(ScriptedGateway::with_count(19));
        gateway.set_write(Ok(WriteReceipt::new(409, true)));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;
        assert_eq!(outcome, SubmissionOutcome::RejectedCapacity);
    }

    #[tokio::test]
    async fn test_error_status_without_signal_is_generic_rejection() {
        let gateway = Arc::new(ScriptedGateway::with_count(4));
        gateway.set_write(Ok(WriteReceipt::new(500, false)));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::rejected("the registration sheet answered with status 500")
        );
        assert_eq!(coordinator.snapshot().count(), 4);
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic_rejection() {
        let gateway = Arc::new(ScriptedGateway::with_count(4));
        gateway.set_write(Err(GatewayError::Timeout));
        let coordinator = coordinator(&gateway);

        let outcome = coordinator.submit(&valid_record()).await;
        assert!(outcome.is_retryable());
    }

    #[tokio::test]
    async fn test_capacity_rejection_triggers_refresh() {
        let gateway = Arc::new(ScriptedGateway::with_count(19));
        gateway.set_write(Ok(WriteReceipt::new(200, true)));
        let coordinator = coordinator(&gateway);

        // Competitors pushed the sheet past the ceiling meanwhile
        let before = gateway.fetches();
        let outcome = coordinator.submit(&valid_record()).await;
        assert_eq!(outcome, SubmissionOutcome::RejectedCapacity);
        // pre-check read + post-rejection read
        assert_eq!(gateway.fetches() - before, 2);

        gateway.set_count(Ok(21));
        coordinator.refresh_count().await;
        assert_eq!(coordinator.snapshot().count(), 21);
    }

    #[tokio::test]
    async fn test_capacity_rejection_marks_full_even_if_refresh_fails() {
        let gateway = Arc::new(ScriptedGateway::with_count(19));
        let coordinator = coordinator(&gateway);
        coordinator.refresh_count().await;

        gateway.set_count(Err(GatewayError::Timeout));
        gateway.set_write(Ok(WriteReceipt::new(200, true)));
        coordinator.submit(&valid_record()).await;

        assert!(!coordinator.has_capacity());
        assert_eq!(coordinator.snapshot().count(), 20);
    }

    #[tokio::test]
    async fn test_losing_the_race_at_nineteen_is_capacity_rejection() {
        // Client saw 19; two competitors submitted first and the sheet is full
        let sheet = Arc::new(SharedSheet::new(19));
        let me = CapacityCoordinator::new(sheet.clone());
        me.refresh_count().await;
        assert_eq!(me.snapshot().count(), 19);

        let rival_a = CapacityCoordinator::new(sheet.clone());
        let rival_b = CapacityCoordinator::new(sheet.clone());
        assert_eq!(rival_a.submit(&valid_record()).await, SubmissionOutcome::Accepted);
        assert_eq!(
            rival_b.submit(&valid_record()).await,
            SubmissionOutcome::RejectedCapacity
        );

        assert_eq!(
            me.submit(&valid_record()).await,
            SubmissionOutcome::RejectedCapacity
        );
        assert_eq!(me.snapshot().count(), 20);
        assert_eq!(sheet.rows(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clients_fill_exactly_to_ceiling() {
        let sheet = Arc::new(SharedSheet::new(0));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let client = Arc::new(CapacityCoordinator::new(sheet.clone()));
            handles.push(tokio::spawn(async move {
                client.submit(&valid_record()).await
            }));
        }

        let mut accepted = 0;
        let mut rejected_capacity = 0;
        for handle in handles {
            match handle.await.unwrap() {
                SubmissionOutcome::Accepted => accepted += 1,
                SubmissionOutcome::RejectedCapacity => rejected_capacity += 1,
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert_eq!(accepted, 20);
        assert_eq!(rejected_capacity, 12);
        assert_eq!(sheet.rows(), 20);
    }

    // ==================== audit ====================

    struct RecordingAudit(StdMutex<Vec<&'static str>>);

    impl AuditLog for RecordingAudit {
        fn log(&self, event: AuditEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_submit_writes_attempt_and_outcome_to_audit_log() {
        let gateway = Arc::new(ScriptedGateway::with_count(1));
        let audit = Arc::new(RecordingAudit(StdMutex::new(Vec::new())));
        let coordinator = CapacityCoordinator::new(gateway).with_audit_log(audit.clone());

        coordinator.submit(&valid_record()).await;

        let events = audit.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["submit_attempt", "count_refreshed", "submit_outcome"]
        );
    }
}
