//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! implement or consume.

pub mod audit_log;
pub mod registration_gateway;
pub mod ui_event;
