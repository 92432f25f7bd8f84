//! Registration Controller (actor).
//!
//! Single owner of the [`RegistrationState`]. Everything that can change the
//! state arrives as a discrete event on one `select!` loop:
//!
//! - user commands ([`ControllerCommand`]) on an mpsc channel
//! - poll results from the background poller
//! - the completion of the one in-flight submit (a `JoinSet`)
//! - cancellation of the controller's token
//!
//! The presentation layer holds a [`RegistrationHandle`] and renders the
//! [`UiEvent`]s the controller emits.

use super::capacity_coordinator::{CapacityCoordinator, RefreshOutcome};
use super::poller::{PollerHandle, spawn_poller};
use crate::config::RegistrationSettings;
use crate::ports::audit_log::{AuditLog, NoAuditLog};
use crate::ports::registration_gateway::RegistrationGateway;
use crate::ports::ui_event::{Notice, UiEvent};
use signup_domain::{
    CEILING, CapacitySnapshot, LifecycleEvent, RegistrationForm, RegistrationState,
    SubmissionOutcome,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Commands accepted by the controller.
pub enum ControllerCommand {
    /// Provide the registration endpoint (only meaningful in `Setup`)
    Configure(Arc<dyn RegistrationGateway>),
    /// Validate and submit a filled-in form
    Submit(RegistrationForm),
    /// Stop polling, emit `Closed` and exit
    Shutdown,
}

/// Handle to a spawned controller.
pub struct RegistrationHandle {
    cmd_tx: mpsc::UnboundedSender<ControllerCommand>,
    join: JoinHandle<()>,
}

impl RegistrationHandle {
    /// Returns false if the controller has already exited.
    pub fn configure(&self, gateway: Arc<dyn RegistrationGateway>) -> bool {
        self.cmd_tx
            .send(ControllerCommand::Configure(gateway))
            .is_ok()
    }

    /// Returns false if the controller has already exited.
    pub fn submit(&self, form: RegistrationForm) -> bool {
        self.cmd_tx.send(ControllerCommand::Submit(form)).is_ok()
    }

    /// Ask the controller to exit and wait for it.
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(ControllerCommand::Shutdown);
        let _ = self.join.await;
    }
}

/// Submission lifecycle controller.
pub struct RegistrationController {
    state: RegistrationState,
    settings: RegistrationSettings,
    /// Endpoint given at construction; turned into the coordinator on start.
    initial_gateway: Option<Arc<dyn RegistrationGateway>>,
    coordinator: Option<Arc<CapacityCoordinator>>,
    audit: Arc<dyn AuditLog>,
    tx: mpsc::UnboundedSender<UiEvent>,
    cancellation: CancellationToken,
    poller: Option<PollerHandle>,
    /// Form of the in-flight submit, handed back if it fails.
    pending_form: Option<RegistrationForm>,
    last_count: Option<CapacitySnapshot>,
}

impl RegistrationController {
    /// Create a controller with no endpoint; it starts in `Setup`.
    pub fn new(settings: RegistrationSettings, tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            state: RegistrationState::initial(false),
            settings,
            initial_gateway: None,
            coordinator: None,
            audit: Arc::new(NoAuditLog),
            tx,
            cancellation: CancellationToken::new(),
            poller: None,
            pending_form: None,
            last_count: None,
        }
    }

    // ==================== Builder Methods ====================

    /// Start with a known endpoint; the controller begins in `Loading`.
    pub fn with_gateway(mut self, gateway: Arc<dyn RegistrationGateway>) -> Self {
        self.initial_gateway = Some(gateway);
        self.state = RegistrationState::initial(true);
        self
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    fn build_coordinator(&self, gateway: Arc<dyn RegistrationGateway>) -> Arc<CapacityCoordinator> {
        Arc::new(CapacityCoordinator::new(gateway).with_audit_log(self.audit.clone()))
    }

    /// Spawn the actor loop and return its handle.
    pub fn spawn(self) -> RegistrationHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(self.run(cmd_rx));
        RegistrationHandle { cmd_tx, join }
    }

    /// Actor loop. Returns after `Shutdown`, cancellation, or when every
    /// command sender is dropped.
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ControllerCommand>) {
        let (poll_tx, mut poll_rx) = mpsc::unbounded_channel::<RefreshOutcome>();
        let mut submits: JoinSet<SubmissionOutcome> = JoinSet::new();
        let token = self.cancellation.clone();

        if let Some(gateway) = self.initial_gateway.take() {
            self.coordinator = Some(self.build_coordinator(gateway));
        }
        self.emit(UiEvent::StateChanged(self.state));
        if self.state == RegistrationState::Loading {
            self.load(&poll_tx).await;
        }

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => break,

                Some(res) = submits.join_next() => {
                    let outcome = match res {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!("Submit task failed: {}", e);
                            SubmissionOutcome::rejected("the submission was interrupted")
                        }
                    };
                    self.finish_submit(outcome).await;
                }

                Some(outcome) = poll_rx.recv() => {
                    self.on_poll(outcome).await;
                }

                cmd = cmd_rx.recv() => {
                    match cmd {
                        None | Some(ControllerCommand::Shutdown) => break,
                        Some(ControllerCommand::Configure(gateway)) => {
                            self.configure(gateway, &poll_tx).await;
                        }
                        Some(ControllerCommand::Submit(form)) => {
                            self.begin_submit(form, &mut submits);
                        }
                    }
                }
            }
        }

        submits.abort_all();
        self.stop_polling().await;
        debug!("Registration controller exiting in state {}", self.state);
        self.emit(UiEvent::Closed);
    }

    // ==================== Event Handlers ====================

    async fn configure(
        &mut self,
        gateway: Arc<dyn RegistrationGateway>,
        poll_tx: &mpsc::UnboundedSender<RefreshOutcome>,
    ) {
        if self.state != RegistrationState::Setup {
            self.emit(UiEvent::Notice(Notice::error(
                "The registration endpoint is already configured",
            )));
            return;
        }
        self.coordinator = Some(self.build_coordinator(gateway));
        if self.transition(LifecycleEvent::EndpointConfigured) {
            self.load(poll_tx).await;
        }
    }

    /// Initial count read: Loading → Open or CapacityReached.
    async fn load(&mut self, poll_tx: &mpsc::UnboundedSender<RefreshOutcome>) {
        let Some(coordinator) = self.coordinator.clone() else {
            return;
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return,
            outcome = coordinator.refresh_count() => outcome,
        };
        self.publish_count(outcome.snapshot(), true);

        let resolved = match outcome {
            RefreshOutcome::Refreshed(snapshot) => Some(snapshot),
            RefreshOutcome::Unchanged(_) => {
                info!("Initial count unavailable, opening the form anyway");
                self.emit(UiEvent::Notice(Notice::info(
                    "Could not read the registration count; you can still register",
                )));
                None
            }
        };
        self.transition(LifecycleEvent::InitialCountResolved(resolved));

        if self.state.wants_polling() {
            self.poller = Some(spawn_poller(
                coordinator,
                self.settings.poll_interval,
                &self.cancellation,
                poll_tx.clone(),
            ));
        }
    }

    async fn on_poll(&mut self, outcome: RefreshOutcome) {
        if self.state.is_terminal() {
            return;
        }
        let snapshot = outcome.snapshot();
        self.publish_count(snapshot, false);

        if outcome.is_refreshed() {
            self.transition(LifecycleEvent::PollObserved(snapshot));
        }
        if self.state == RegistrationState::CapacityReached {
            self.emit(UiEvent::Notice(Notice::error(capacity_message())));
            self.stop_polling().await;
        }
    }

    fn begin_submit(&mut self, form: RegistrationForm, submits: &mut JoinSet<SubmissionOutcome>) {
        let record = match form.validate(&self.settings.email_policy) {
            Ok(record) => record,
            Err(errors) => {
                debug!("Form rejected with {} field error(s)", errors.len());
                self.emit(UiEvent::ValidationFailed(errors));
                return;
            }
        };

        let refusal = match self.state {
            RegistrationState::Setup => Some(Notice::error(
                "Please configure the registration webhook URL first",
            )),
            RegistrationState::Loading => {
                Some(Notice::info("Still loading the registration count"))
            }
            RegistrationState::Submitting => {
                Some(Notice::error("A submission is already in progress"))
            }
            RegistrationState::Submitted | RegistrationState::CapacityReached => {
                Some(Notice::error("Registration is closed"))
            }
            RegistrationState::Open => None,
        };
        if let Some(notice) = refusal {
            self.emit(UiEvent::Notice(notice));
            return;
        }

        let Some(coordinator) = self.coordinator.clone() else {
            self.emit(UiEvent::Notice(Notice::error(
                "Please configure the registration webhook URL first",
            )));
            return;
        };

        if !self.transition(LifecycleEvent::SubmitStarted) {
            return;
        }
        info!("Submitting team '{}'", record.team_name());
        self.pending_form = Some(form);
        submits.spawn(async move { coordinator.submit(&record).await });
    }

    async fn finish_submit(&mut self, outcome: SubmissionOutcome) {
        let form = self.pending_form.take();
        if let Some(coordinator) = &self.coordinator {
            self.publish_count(coordinator.snapshot(), false);
        }

        self.transition(LifecycleEvent::SubmitFinished(outcome.clone()));

        match outcome {
            SubmissionOutcome::Accepted => {
                self.emit(UiEvent::Notice(Notice::success("Team successfully registered!")));
            }
            SubmissionOutcome::RejectedCapacity => {
                self.emit(UiEvent::Notice(Notice::error(capacity_message())));
            }
            SubmissionOutcome::RejectedOther { reason } => {
                warn!("Submission failed: {}", reason);
                self.emit(UiEvent::Notice(Notice::error(
                    "Failed to submit. Please try again.",
                )));
                if let Some(form) = form {
                    self.emit(UiEvent::SubmissionRetained(form));
                }
            }
        }

        if self.state.is_terminal() {
            self.stop_polling().await;
        }
    }

    // ==================== Helpers ====================

    /// Apply a lifecycle event; emits `StateChanged` when the state moves.
    fn transition(&mut self, event: LifecycleEvent) -> bool {
        match self.state.apply(&event) {
            Ok(next) => {
                if next != self.state {
                    debug!("{} --{}--> {}", self.state, event.as_str(), next);
                    self.state = next;
                    self.emit(UiEvent::StateChanged(next));
                }
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    fn publish_count(&mut self, snapshot: CapacitySnapshot, force: bool) {
        if force || self.last_count != Some(snapshot) {
            self.last_count = Some(snapshot);
            self.emit(UiEvent::CountUpdated(snapshot));
        }
    }

    async fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}

fn capacity_message() -> String {
    format!("Submission capacity has been reached ({CEILING}/{CEILING})")
}
