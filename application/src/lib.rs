//! Application layer for team-signup
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, RegistrationSettings};
pub use ports::{
    audit_log::{AuditEvent, AuditLog, NoAuditLog},
    registration_gateway::{GatewayError, RegistrationGateway, Submission, WriteReceipt},
    ui_event::{Notice, NoticeLevel, UiEvent},
};
pub use use_cases::capacity_coordinator::{CapacityCoordinator, RefreshOutcome};
pub use use_cases::poller::{PollerHandle, spawn_poller};
pub use use_cases::registration_controller::{
    ControllerCommand, RegistrationController, RegistrationHandle,
};
