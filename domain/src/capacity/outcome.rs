//! Result of one submission attempt.

use serde::{Deserialize, Serialize};

/// What happened to a single submit attempt.
///
/// Produced once per attempt and consumed immediately by the lifecycle;
/// never persisted. Capacity rejection is an expected outcome of losing the
/// race against other submitters, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The remote sheet recorded the team.
    Accepted,
    /// The ceiling was already reached, locally or at write time.
    RejectedCapacity,
    /// Any other failure; `reason` is a short user-facing message.
    RejectedOther { reason: String },
}

impl SubmissionOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        SubmissionOutcome::RejectedOther {
            reason: reason.into(),
        }
    }

    /// Whether the form may be submitted again after this outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionOutcome::RejectedOther { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted => "accepted",
            SubmissionOutcome::RejectedCapacity => "rejected_capacity",
            SubmissionOutcome::RejectedOther { .. } => "rejected_other",
        }
    }
}
