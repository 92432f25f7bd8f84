//! Launch schedule and countdown arithmetic.

use crate::core::error::DomainError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Launch instant used when none is configured (Oct 16, 2025 12:00 PM EDT).
pub const DEFAULT_LAUNCH_TIME: &str = "2025-10-16T12:00:00-04:00";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left until launch, split into whole units (floor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub is_expired: bool,
}

impl TimeRemaining {
    pub fn expired() -> Self {
        Self {
            is_expired: true,
            ..Self::default()
        }
    }

    fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            return Self::expired();
        }
        Self {
            days: (ms / MS_PER_DAY) as u64,
            hours: ((ms % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((ms % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((ms % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
            is_expired: false,
        }
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// The instant registration opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSchedule {
    launch_at: DateTime<FixedOffset>,
}

impl LaunchSchedule {
    pub fn new(launch_at: DateTime<FixedOffset>) -> Self {
        Self { launch_at }
    }

    /// Parse an RFC 3339 timestamp with offset, e.g. `2025-10-16T12:00:00-04:00`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        DateTime::parse_from_rfc3339(value.trim())
            .map(Self::new)
            .map_err(|e| DomainError::InvalidLaunchTime {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Parse when configured, otherwise fall back to [`DEFAULT_LAUNCH_TIME`].
    pub fn from_config(value: Option<&str>) -> Result<Self, DomainError> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::parse(v),
            _ => Ok(Self::default()),
        }
    }

    pub fn launch_at(&self) -> DateTime<FixedOffset> {
        self.launch_at
    }

    pub fn has_launched(&self, now: DateTime<Utc>) -> bool {
        now >= self.launch_at.with_timezone(&Utc)
    }

    pub fn time_remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        let delta = self.launch_at.with_timezone(&Utc) - now;
        TimeRemaining::from_millis(delta.num_milliseconds())
    }
}

impl Default for LaunchSchedule {
    fn default() -> Self {
        Self::parse(DEFAULT_LAUNCH_TIME).expect("DEFAULT_LAUNCH_TIME is valid RFC 3339")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn schedule() -> LaunchSchedule {
        LaunchSchedule::parse("2025-10-16T12:00:00-04:00").unwrap()
    }

    fn launch_utc() -> DateTime<Utc> {
        schedule().launch_at().with_timezone(&Utc)
    }

    #[test]
    fn test_default_schedule_matches_constant() {
        let default = LaunchSchedule::default();
        assert_eq!(default, schedule());
        assert_eq!(
            default.launch_at().with_timezone(&Utc).to_rfc3339(),
            "2025-10-16T16:00:00+00:00"
        );
    }

    #[test]
    fn test_from_config_falls_back_on_absent_or_blank() {
        assert_eq!(LaunchSchedule::from_config(None).unwrap(), schedule());
        assert_eq!(LaunchSchedule::from_config(Some("  ")).unwrap(), schedule());
    }

    #[test]
    fn test_from_config_rejects_garbage() {
        let err = LaunchSchedule::from_config(Some("next tuesday")).unwrap_err();
        assert!(err.is_launch_time());
    }

    #[test]
    fn test_launched_at_and_after_instant() {
        let s = schedule();
        assert!(!s.has_launched(launch_utc() - TimeDelta::milliseconds(1)));
        assert!(s.has_launched(launch_utc()));
        assert!(s.has_launched(launch_utc() + TimeDelta::days(3)));
    }

    #[test]
    fn test_remaining_splits_into_units() {
        let now = launch_utc()
            - (TimeDelta::days(2)
                + TimeDelta::hours(3)
                + TimeDelta::minutes(4)
                + TimeDelta::seconds(5)
                + TimeDelta::milliseconds(999));
        let remaining = schedule().time_remaining(now);
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
                is_expired: false,
            }
        );
    }

    #[test]
    fn test_remaining_is_expired_at_launch() {
        assert_eq!(schedule().time_remaining(launch_utc()), TimeRemaining::expired());
        assert!(
            schedule()
                .time_remaining(launch_utc() + TimeDelta::seconds(10))
                .is_expired
        );
    }

    #[test]
    fn test_sub_second_remaining_is_not_expired() {
        let remaining = schedule().time_remaining(launch_utc() - TimeDelta::milliseconds(400));
        assert!(!remaining.is_expired);
        assert_eq!(remaining.seconds, 0);
    }

    #[test]
    fn test_display_zero_pads() {
        let remaining = TimeRemaining {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
            is_expired: false,
        };
        assert_eq!(remaining.to_string(), "01d 02h 03m 04s");
    }
}
