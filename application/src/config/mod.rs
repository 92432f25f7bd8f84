//! Application-level configuration.
//!
//! - [`RegistrationSettings`]: poll cadence and email policy for the controller

pub mod registration_settings;

pub use registration_settings::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, RegistrationSettings};
