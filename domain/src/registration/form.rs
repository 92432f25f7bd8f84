//! Raw registration form input and its validation.

use super::record::{Member, RegistrationRecord};
use super::validation::{
    EmailPolicy, FieldError, FieldKey, PERSON_NAME_MAX, PERSON_NAME_MIN, TEAM_NAME_MAX,
    TEAM_NAME_MIN, TEAM_SIZE, ValidationErrors, check_length,
};
use serde::{Deserialize, Serialize};

/// One member's fields exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl MemberForm {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// The registration form as typed by the user, before validation.
///
/// Kept intact across a failed submission so entered values are not lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub team_name: String,
    pub members: [MemberForm; TEAM_SIZE],
}

impl RegistrationForm {
    pub fn new(team_name: impl Into<String>, members: [MemberForm; TEAM_SIZE]) -> Self {
        Self {
            team_name: team_name.into(),
            members,
        }
    }

    /// Current raw value of a field. A member slot past the team size reads
    /// as empty.
    pub fn get(&self, field: FieldKey) -> &str {
        let member = field.slot().and_then(|slot| self.members.get(slot));
        match (field, member) {
            (FieldKey::TeamName, _) => &self.team_name,
            (FieldKey::FirstName(_), Some(m)) => &m.first_name,
            (FieldKey::LastName(_), Some(m)) => &m.last_name,
            (FieldKey::Email(_), Some(m)) => &m.email,
            (_, None) => "",
        }
    }

    /// Overwrite a field. Writes to a member slot past the team size are
    /// dropped.
    pub fn set(&mut self, field: FieldKey, value: impl Into<String>) {
        let value = value.into();
        let member = field.slot().and_then(|slot| self.members.get_mut(slot));
        match (field, member) {
            (FieldKey::TeamName, _) => self.team_name = value,
            (FieldKey::FirstName(_), Some(m)) => m.first_name = value,
            (FieldKey::LastName(_), Some(m)) => m.last_name = value,
            (FieldKey::Email(_), Some(m)) => m.email = value,
            (_, None) => {}
        }
    }

    /// Validate a single field.
    pub fn validate_field(&self, field: FieldKey, policy: &EmailPolicy) -> Result<(), FieldError> {
        if field.slot().is_some_and(|slot| slot >= TEAM_SIZE) {
            return Err(FieldError::new(field, "Unknown team member"));
        }
        let value = self.get(field);
        let result = match field {
            FieldKey::TeamName => check_length(
                value,
                TEAM_NAME_MIN,
                TEAM_NAME_MAX,
                "Team name must be at least 2 characters",
                "Team name",
            ),
            FieldKey::FirstName(_) => check_length(
                value,
                PERSON_NAME_MIN,
                PERSON_NAME_MAX,
                "First name required",
                "First name",
            ),
            FieldKey::LastName(_) => check_length(
                value,
                PERSON_NAME_MIN,
                PERSON_NAME_MAX,
                "Last name required",
                "Last name",
            ),
            FieldKey::Email(_) => policy.check(value),
        };
        result.map_err(|message| FieldError::new(field, message))
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self, policy: &EmailPolicy) -> Result<RegistrationRecord, ValidationErrors> {
        let errors: Vec<FieldError> = FieldKey::all()
            .into_iter()
            .filter_map(|field| self.validate_field(field, policy).err())
            .collect();

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        let members = self.members.clone().map(|m| {
            Member::new(
                m.first_name.trim().to_string(),
                m.last_name.trim().to_string(),
                m.email.trim().to_string(),
            )
        });
        Ok(RegistrationRecord::new(
            self.team_name.trim().to_string(),
            members,
        ))
    }
}
