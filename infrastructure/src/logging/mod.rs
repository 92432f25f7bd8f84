//! Logging infrastructure: structured audit logging.
//!
//! Provides [`JsonlAuditLog`], a JSONL file writer that implements
//! the [`AuditLog`](signup_application::AuditLog) port.

mod jsonl_audit_log;

pub use jsonl_audit_log::JsonlAuditLog;
