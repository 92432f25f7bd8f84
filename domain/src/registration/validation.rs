//! Field-level validation rules for team registration.
//!
//! Every field of a [`RegistrationForm`](super::form::RegistrationForm) is
//! checked independently so the caller gets the complete list of problems
//! in one pass, each tagged with a stable [`FieldKey`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length (in characters) of the team name.
pub const TEAM_NAME_MIN: usize = 2;
/// Maximum length (in characters) of the team name.
pub const TEAM_NAME_MAX: usize = 100;
/// Minimum length (in characters) of a member's first or last name.
pub const PERSON_NAME_MIN: usize = 2;
/// Maximum length (in characters) of a member's first or last name.
pub const PERSON_NAME_MAX: usize = 50;

/// Number of members every team must register.
pub const TEAM_SIZE: usize = 3;

/// Identifies one input field of the registration form.
///
/// Member slots are zero-based internally and rendered one-based
/// (`member1FirstName` … `member3Email`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    TeamName,
    FirstName(usize),
    LastName(usize),
    Email(usize),
}

impl FieldKey {
    /// All fields in the order a form presents them.
    pub fn all() -> Vec<FieldKey> {
        let mut fields = vec![FieldKey::TeamName];
        for slot in 0..TEAM_SIZE {
            fields.push(FieldKey::FirstName(slot));
            fields.push(FieldKey::LastName(slot));
            fields.push(FieldKey::Email(slot));
        }
        fields
    }

    /// Human readable label, e.g. `Member 2 Email`.
    pub fn label(&self) -> String {
        match self {
            FieldKey::TeamName => "Team Name".to_string(),
            FieldKey::FirstName(slot) => format!("Member {} First Name", slot + 1),
            FieldKey::LastName(slot) => format!("Member {} Last Name", slot + 1),
            FieldKey::Email(slot) => format!("Member {} Email", slot + 1),
        }
    }

    /// Member slot this field belongs to, if any.
    pub fn slot(&self) -> Option<usize> {
        match self {
            FieldKey::TeamName => None,
            FieldKey::FirstName(slot) | FieldKey::LastName(slot) | FieldKey::Email(slot) => {
                Some(*slot)
            }
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::TeamName => write!(f, "teamName"),
            FieldKey::FirstName(slot) => write!(f, "member{}FirstName", slot + 1),
            FieldKey::LastName(slot) => write!(f, "member{}LastName", slot + 1),
            FieldKey::Email(slot) => write!(f, "member{}Email", slot + 1),
        }
    }
}

/// A single failed field with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one validation pass (never empty).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a specific field, if it failed.
    pub fn for_field(&self, field: FieldKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: FieldKey) -> bool {
        self.for_field(field).is_some()
    }
}

/// Email acceptance policy.
///
/// The open variant accepts any well-formed address; the restricted variant
/// additionally requires an institutional domain suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPolicy {
    required_suffix: Option<String>,
}

impl EmailPolicy {
    /// Accept any well-formed address.
    pub fn open() -> Self {
        Self::default()
    }

    /// Require addresses ending with `@<domain>`.
    ///
    /// Accepts `example.edu` or `@example.edu`.
    pub fn restricted_to(domain: &str) -> Result<Self, DomainError> {
        let domain = domain.trim().trim_start_matches('@');
        let well_formed = !domain.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !well_formed {
            return Err(DomainError::InvalidEmailDomain(domain.to_string()));
        }
        Ok(Self {
            required_suffix: Some(format!("@{}", domain.to_ascii_lowercase())),
        })
    }

    /// The required suffix including the leading `@`, if restricted.
    pub fn required_suffix(&self) -> Option<&str> {
        self.required_suffix.as_deref()
    }

    /// Check an email against shape and suffix rules.
    ///
    /// Returns the user-facing message on failure.
    pub fn check(&self, email: &str) -> Result<(), String> {
        let email = email.trim();
        if !validator::validate_email(email) {
            return Err("Invalid email address".to_string());
        }
        if let Some(suffix) = &self.required_suffix
            && !email.to_ascii_lowercase().ends_with(suffix.as_str())
        {
            return Err(format!("Email must end with {}", suffix));
        }
        Ok(())
    }
}

/// Check a trimmed value against character-count bounds.
pub(crate) fn check_length(
    value: &str,
    min: usize,
    max: usize,
    too_short: &str,
    label: &str,
) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(too_short.to_string());
    }
    if len > max {
        return Err(format!("{} must be at most {} characters", label, max));
    }
    Ok(())
}
