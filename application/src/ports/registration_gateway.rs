//! Registration Gateway port
//!
//! Defines the interface for talking to the external capacity/write endpoint.
//! The endpoint's whole contract is two actions: read the current count and
//! submit one team.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signup_domain::RegistrationRecord;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Short message safe to show to a user.
    ///
    /// Never includes the underlying transport error text.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::ConnectionError(_) => {
                "could not reach the registration sheet".to_string()
            }
            GatewayError::Timeout => "the registration sheet did not respond in time".to_string(),
            GatewayError::HttpStatus(status) => {
                format!("the registration sheet answered with status {}", status)
            }
            GatewayError::MalformedResponse(_) => {
                "the registration sheet sent an unreadable reply".to_string()
            }
        }
    }
}

/// One write request: the validated record plus the submission instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub record: RegistrationRecord,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(record: RegistrationRecord, submitted_at: DateTime<Utc>) -> Self {
        Self {
            record,
            submitted_at,
        }
    }
}

/// What the endpoint said about a write that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Transport status code.
    pub status: u16,
    /// The body asserted the ceiling was already reached at write time.
    pub capacity_exceeded: bool,
}

impl WriteReceipt {
    pub fn new(status: u16, capacity_exceeded: bool) -> Self {
        Self {
            status,
            capacity_exceeded,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Gateway for the shared registration sheet
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    /// Read the authoritative number of accepted registrations.
    async fn fetch_count(&self) -> Result<u32, GatewayError>;

    /// Send one registration.
    ///
    /// Returns `Ok` whenever the endpoint answered, whatever the status;
    /// `Err` only for transport-level failures.
    async fn submit(&self, submission: &Submission) -> Result<WriteReceipt, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_success_is_2xx() {
        assert!(WriteReceipt::new(200, false).is_success());
        assert!(WriteReceipt::new(204, false).is_success());
        assert!(!WriteReceipt::new(302, false).is_success());
        assert!(!WriteReceipt::new(500, false).is_success());
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = GatewayError::ConnectionError("dns error: no such host 10.0.0.1".to_string());
        assert!(!err.user_message().contains("10.0.0.1"));
        assert_eq!(
            GatewayError::HttpStatus(503).user_message(),
            "the registration sheet answered with status 503"
        );
    }
}
