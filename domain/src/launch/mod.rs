//! Launch gate: when registration opens and which page is reachable.

pub mod route;
pub mod schedule;
