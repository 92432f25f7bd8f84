//! Domain layer for team-signup
//!
//! This crate contains the core business rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Capacity
//!
//! Registration is capped at a fixed [`CEILING`] of teams. The client only
//! ever holds a [`CapacitySnapshot`] of the shared counter; the remote sheet
//! is authoritative, so losing a race for the last slot is an ordinary
//! [`SubmissionOutcome::RejectedCapacity`].
//!
//! ## Lifecycle
//!
//! The registration page moves through [`RegistrationState`]s driven by
//! [`LifecycleEvent`]s. `Submitted` and `CapacityReached` are terminal.
//!
//! ## Launch gate
//!
//! [`LaunchSchedule`] decides whether the countdown or the form is shown.

pub mod capacity;
pub mod core;
pub mod launch;
pub mod lifecycle;
pub mod registration;

// Re-export commonly used types
pub use capacity::{
    outcome::SubmissionOutcome,
    snapshot::{CEILING, CapacitySnapshot},
};
pub use core::error::DomainError;
pub use launch::{
    route::{Route, RouteDecision},
    schedule::{DEFAULT_LAUNCH_TIME, LaunchSchedule, TimeRemaining},
};
pub use lifecycle::{LifecycleEvent, RegistrationState, TransitionError};
pub use registration::{
    form::{MemberForm, RegistrationForm},
    record::{Member, RegistrationRecord},
    validation::{EmailPolicy, FieldError, FieldKey, TEAM_SIZE, ValidationErrors},
};
