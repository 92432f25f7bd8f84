//! UI event types emitted by the registration controller
//!
//! These events form the output port from the application layer to the
//! presentation layer, which renders them (console presenter for the CLI).

use signup_domain::{CapacitySnapshot, RegistrationForm, RegistrationState, ValidationErrors};

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A short message shown transiently (toast-style).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Events emitted by the controller for the presentation layer to render
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Lifecycle moved to a new state
    StateChanged(RegistrationState),
    /// The displayed count changed
    CountUpdated(CapacitySnapshot),
    /// Transient notice
    Notice(Notice),
    /// The form failed field-level validation; nothing was sent
    ValidationFailed(ValidationErrors),
    /// A failed submission handed back so entered values are not lost
    SubmissionRetained(RegistrationForm),
    /// The controller stopped
    Closed,
}

impl UiEvent {
    /// The state carried by a `StateChanged` event.
    pub fn state(&self) -> Option<RegistrationState> {
        match self {
            UiEvent::StateChanged(state) => Some(*state),
            _ => None,
        }
    }
}
