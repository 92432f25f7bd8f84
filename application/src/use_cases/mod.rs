//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod capacity_coordinator;
pub mod poller;
pub mod registration_controller;
