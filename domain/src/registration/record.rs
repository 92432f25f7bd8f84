//! Validated registration record (Value Object)

use super::validation::TEAM_SIZE;
use serde::{Deserialize, Serialize};

/// One validated team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    first_name: String,
    last_name: String,
    email: String,
}

impl Member {
    pub(crate) fn new(first_name: String, last_name: String, email: String) -> Self {
        Self {
            first_name,
            last_name,
            email,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A team registration that passed every field rule.
///
/// Only obtainable through
/// [`RegistrationForm::validate`](super::form::RegistrationForm::validate), so
/// holding one proves no field is out of bounds. Values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    team_name: String,
    members: [Member; TEAM_SIZE],
}

impl RegistrationRecord {
    pub(crate) fn new(team_name: String, members: [Member; TEAM_SIZE]) -> Self {
        Self { team_name, members }
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn members(&self) -> &[Member; TEAM_SIZE] {
        &self.members
    }
}

impl std::fmt::Display for RegistrationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (", self.team_name)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", member.first_name, member.last_name)?;
        }
        write!(f, ")")
    }
}
