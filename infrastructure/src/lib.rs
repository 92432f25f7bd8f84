//! Infrastructure layer for team-signup
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, ConfigLoader, FileConfig, Severity};
pub use gateway::{DEFAULT_REQUEST_TIMEOUT, WebhookError, WebhookGateway};
pub use logging::JsonlAuditLog;
