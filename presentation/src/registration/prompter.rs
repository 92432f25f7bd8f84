//! Field-by-field form entry.
//!
//! [`FormPrompter`] is fed one input line at a time. It validates each field
//! as it is entered and re-asks the same field until the value passes, so a
//! completed form has already passed every field check.

use signup_domain::{EmailPolicy, FieldError, FieldKey, RegistrationForm, ValidationErrors};

/// Result of feeding one line to the prompter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    /// Moved on to the next field
    Next,
    /// The value was rejected; the same field is asked again
    Invalid(FieldError),
    /// Every field is filled in
    Complete(RegistrationForm),
}

pub struct FormPrompter {
    form: RegistrationForm,
    fields: Vec<FieldKey>,
    index: usize,
    policy: EmailPolicy,
}

impl FormPrompter {
    /// Ask every field of an empty form.
    pub fn new(policy: EmailPolicy) -> Self {
        Self {
            form: RegistrationForm::default(),
            fields: FieldKey::all(),
            index: 0,
            policy,
        }
    }

    /// Ask every field again, offering the existing values as defaults.
    pub fn edit(form: RegistrationForm, policy: EmailPolicy) -> Self {
        Self {
            form,
            fields: FieldKey::all(),
            index: 0,
            policy,
        }
    }

    /// Ask only the fields that failed validation.
    pub fn correct(form: RegistrationForm, errors: &ValidationErrors, policy: EmailPolicy) -> Self {
        let fields = FieldKey::all()
            .into_iter()
            .filter(|f| errors.contains(*f))
            .collect();
        Self {
            form,
            fields,
            index: 0,
            policy,
        }
    }

    /// Field currently being asked.
    pub fn current(&self) -> Option<FieldKey> {
        self.fields.get(self.index).copied()
    }

    /// Value the current field already holds.
    pub fn current_value(&self) -> &str {
        self.current().map(|f| self.form.get(f)).unwrap_or("")
    }

    /// Feed one line of input for the current field.
    ///
    /// A blank line keeps the existing value, if there is one.
    pub fn accept(&mut self, line: &str) -> PromptStep {
        let Some(field) = self.current() else {
            return PromptStep::Complete(self.form.clone());
        };

        let input = line.trim();
        if !input.is_empty() {
            self.form.set(field, input);
        }

        if let Err(error) = self.form.validate_field(field, &self.policy) {
            return PromptStep::Invalid(error);
        }

        self.index += 1;
        if self.index >= self.fields.len() {
            PromptStep::Complete(self.form.clone())
        } else {
            PromptStep::Next
        }
    }
}
