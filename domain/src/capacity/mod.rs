//! Registration capacity: the shared counter and per-attempt outcomes.

pub mod outcome;
pub mod snapshot;
