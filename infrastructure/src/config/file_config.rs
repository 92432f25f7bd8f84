//! Raw TOML configuration data types
//!
//! [`FileConfig`] mirrors the config file one-to-one. Values are kept as
//! plain strings and numbers here and turned into domain types by the
//! accessor methods, so a bad value can be reported through
//! [`FileConfig::validate`] instead of failing deserialization.

use crate::gateway::parse_webhook_url;
use serde::{Deserialize, Serialize};
use signup_application::RegistrationSettings;
use signup_domain::{DomainError, EmailPolicy, LaunchSchedule};
use std::path::PathBuf;
use std::time::Duration;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    InvalidLaunchTime,
    InvalidWebhookUrl,
    ZeroPollInterval,
    ZeroRequestTimeout,
    InvalidEmailDomain,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Registration endpoint; when unset the form asks for it
    pub webhook_url: Option<String>,
    /// Launch instant (RFC 3339)
    pub launch_time: Option<String>,
    /// Background count poll cadence
    pub poll_interval_secs: u64,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Only accept member emails at this domain
    pub email_domain: Option<String>,
    /// JSONL audit trail location
    pub audit_log: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            launch_time: None,
            poll_interval_secs: 5,
            request_timeout_secs: 10,
            email_domain: None,
            audit_log: None,
        }
    }
}

impl FileConfig {
    /// Configured webhook URL, ignoring blank values.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn launch_schedule(&self) -> Result<LaunchSchedule, DomainError> {
        LaunchSchedule::from_config(self.launch_time.as_deref())
    }

    pub fn email_policy(&self) -> Result<EmailPolicy, DomainError> {
        match self.email_domain.as_deref().map(str::trim) {
            Some(domain) if !domain.is_empty() => EmailPolicy::restricted_to(domain),
            _ => Ok(EmailPolicy::open()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Controller settings derived from this config.
    pub fn registration_settings(&self) -> Result<RegistrationSettings, DomainError> {
        Ok(RegistrationSettings::default()
            .with_poll_interval(self.poll_interval())
            .with_email_policy(self.email_policy()?))
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Err(e) = self.launch_schedule() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidLaunchTime,
                format!("launch_time: {}", e),
            ));
        }

        if let Some(url) = self.webhook_url()
            && let Err(e) = parse_webhook_url(url)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidWebhookUrl,
                format!("webhook_url: {}", e),
            ));
        }

        if self.poll_interval_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroPollInterval,
                "poll_interval_secs cannot be 0, using 1",
            ));
        }

        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRequestTimeout,
                "request_timeout_secs cannot be 0, using 1",
            ));
        }

        if let Err(e) = self.email_policy() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEmailDomain,
                format!("email_domain: {}", e),
            ));
        }

        issues
    }

    /// True if any issue is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
