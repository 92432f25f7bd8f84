//! Team registration input, validation and the validated record.
//!
//! - [`form::RegistrationForm`]: raw values as typed
//! - [`validation`]: field rules, [`validation::EmailPolicy`]
//! - [`record::RegistrationRecord`]: a record that passed every rule

pub mod form;
pub mod record;
pub mod validation;
