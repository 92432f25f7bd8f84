//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid launch time '{value}': {reason}")]
    InvalidLaunchTime { value: String, reason: String },

    #[error("Invalid email domain: {0}")]
    InvalidEmailDomain(String),
}

impl DomainError {
    /// Check if this error came from the launch schedule
    pub fn is_launch_time(&self) -> bool {
        matches!(self, DomainError::InvalidLaunchTime { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_launch_time_display() {
        let error = DomainError::InvalidLaunchTime {
            value: "tomorrow".to_string(),
            reason: "input contains invalid characters".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid launch time 'tomorrow': input contains invalid characters"
        );
    }

    #[test]
    fn test_is_launch_time_check() {
        assert!(
            DomainError::InvalidLaunchTime {
                value: String::new(),
                reason: String::new(),
            }
            .is_launch_time()
        );
        assert!(!DomainError::InvalidEmailDomain("x".to_string()).is_launch_time());
    }
}
