//! Registration lifecycle state machine.
//!
//! | From         | Event                         | To                |
//! |--------------|-------------------------------|-------------------|
//! | Setup        | EndpointConfigured            | Loading           |
//! | Loading      | InitialCountResolved (full)   | CapacityReached   |
//! | Loading      | InitialCountResolved (other)  | Open              |
//! | Open         | SubmitStarted                 | Submitting        |
//! | Open         | PollObserved (full)           | CapacityReached   |
//! | Submitting   | SubmitFinished(Accepted)      | Submitted         |
//! | Submitting   | SubmitFinished(RejectedCapacity) | CapacityReached |
//! | Submitting   | SubmitFinished(RejectedOther) | Open              |
//!
//! `Submitted` and `CapacityReached` are terminal. The machine is pure:
//! it performs no I/O and owns no timers; the application layer reacts to
//! the states it produces (e.g. stopping the poller on a terminal state).

use crate::capacity::outcome::SubmissionOutcome;
use crate::capacity::snapshot::CapacitySnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// UI-facing state of the registration page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    /// The webhook address is not yet known.
    Setup,
    /// Initial count fetch in flight.
    Loading,
    /// Form interactive, count displayed, background polling active.
    Open,
    /// A submit is in flight; the form is disabled.
    Submitting,
    /// This client's team was accepted.
    Submitted,
    /// No further submissions are possible.
    CapacityReached,
}

/// Discrete inputs that drive the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    EndpointConfigured,
    /// First count read finished; `None` means the read failed (fail-open).
    InitialCountResolved(Option<CapacitySnapshot>),
    SubmitStarted,
    SubmitFinished(SubmissionOutcome),
    PollObserved(CapacitySnapshot),
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::EndpointConfigured => "endpoint_configured",
            LifecycleEvent::InitialCountResolved(_) => "initial_count_resolved",
            LifecycleEvent::SubmitStarted => "submit_started",
            LifecycleEvent::SubmitFinished(_) => "submit_finished",
            LifecycleEvent::PollObserved(_) => "poll_observed",
        }
    }
}

/// An event that is not valid in the current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot apply '{event}' in state '{}'", from.as_str())]
pub struct TransitionError {
    pub from: RegistrationState,
    pub event: &'static str,
}

impl RegistrationState {
    /// Initial state for a page that may or may not know its endpoint.
    pub fn initial(endpoint_known: bool) -> Self {
        if endpoint_known {
            RegistrationState::Loading
        } else {
            RegistrationState::Setup
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RegistrationState::Submitted | RegistrationState::CapacityReached
        )
    }

    /// Only the open form accepts a new submission.
    pub fn accepts_input(&self) -> bool {
        matches!(self, RegistrationState::Open)
    }

    /// Whether background polling should run in this state.
    pub fn wants_polling(&self) -> bool {
        matches!(self, RegistrationState::Open | RegistrationState::Submitting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationState::Setup => "setup",
            RegistrationState::Loading => "loading",
            RegistrationState::Open => "open",
            RegistrationState::Submitting => "submitting",
            RegistrationState::Submitted => "submitted",
            RegistrationState::CapacityReached => "capacity_reached",
        }
    }

    /// Compute the next state, or reject the event.
    pub fn apply(self, event: &LifecycleEvent) -> Result<RegistrationState, TransitionError> {
        use LifecycleEvent as E;
        use RegistrationState as S;

        let next = match (self, event) {
            (S::Setup, E::EndpointConfigured) => S::Loading,

            (S::Loading, E::InitialCountResolved(Some(snapshot))) if snapshot.is_full() => {
                S::CapacityReached
            }
            (S::Loading, E::InitialCountResolved(_)) => S::Open,

            (S::Open, E::SubmitStarted) => S::Submitting,

            (S::Submitting, E::SubmitFinished(outcome)) => match outcome {
                SubmissionOutcome::Accepted => S::Submitted,
                SubmissionOutcome::RejectedCapacity => S::CapacityReached,
                SubmissionOutcome::RejectedOther { .. } => S::Open,
            },

            (S::Open, E::PollObserved(snapshot)) if snapshot.is_full() => S::CapacityReached,
            (S::Open, E::PollObserved(_)) => S::Open,
            // A poll landing during a submit or after the page settled must
            // not move the state; the submit outcome decides.
            (S::Submitting | S::Submitted | S::CapacityReached, E::PollObserved(_)) => self,

            (from, event) => {
                return Err(TransitionError {
                    from,
                    event: event.as_str(),
                });
            }
        };
        Ok(next)
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
