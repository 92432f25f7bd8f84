//! Registration settings: controller cadence and field policy.
//!
//! [`RegistrationSettings`] groups the static parameters the
//! [`RegistrationController`](crate::use_cases::registration_controller::RegistrationController)
//! needs. They are read once at startup and never change afterwards.

use signup_domain::EmailPolicy;
use std::time::Duration;

/// Default background poll cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest accepted poll cadence; shorter values are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Controller parameters.
#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    /// How often the count is re-read while the form is open.
    pub poll_interval: Duration,
    /// Email acceptance policy for field validation.
    pub email_policy: EmailPolicy,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            email_policy: EmailPolicy::open(),
        }
    }
}

impl RegistrationSettings {
    // ==================== Builder Methods ====================

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.email_policy = policy;
        self
    }
}
