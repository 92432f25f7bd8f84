//! Capacity snapshot (Value Object)

use serde::{Deserialize, Serialize};

/// Maximum number of accepted team registrations.
pub const CEILING: u32 = 20;

/// Number of accepted registrations as last known by this client.
///
/// Compared against the fixed [`CEILING`]. A snapshot never blocks and
/// never performs I/O; it is only as fresh as the read that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    count: u32,
}

impl CapacitySnapshot {
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// True while another team may register.
    pub fn has_capacity(&self) -> bool {
        self.count < CEILING
    }

    pub fn is_full(&self) -> bool {
        !self.has_capacity()
    }

    pub fn remaining(&self) -> u32 {
        CEILING.saturating_sub(self.count)
    }

    /// Optimistic snapshot after this client's write was accepted.
    pub fn with_accepted(self) -> Self {
        Self {
            count: self.count.saturating_add(1),
        }
    }
}

impl std::fmt::Display for CapacitySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.count, CEILING)
    }
}
