//! Cycle timing.

use chrono::{DateTime, Timelike, Utc};
use std::time::Duration;

const MINUTE: Duration = Duration::from_secs(60);

/// When the next poll cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Top of every UTC minute
    #[default]
    AlignedMinute,
    /// Fixed sleep between cycles
    FixedInterval {
        period: Duration,
        fire_immediately: bool,
    },
}

impl Schedule {
    /// Time to wait before the next cycle, measured from `now`.
    pub fn delay_before(&self, now: DateTime<Utc>, first_cycle: bool) -> Duration {
        match *self {
            Schedule::AlignedMinute => until_next_minute(now),
            Schedule::FixedInterval {
                period,
                fire_immediately,
            } => {
                if first_cycle && fire_immediately {
                    Duration::ZERO
                } else {
                    period
                }
            }
        }
    }
}

/// Remaining time in the current UTC minute. A full minute when `now` is
/// exactly on a boundary.
pub fn until_next_minute(now: DateTime<Utc>) -> Duration {
    // Leap seconds report nanos >= 1e9
    let nanos = now.nanosecond() % 1_000_000_000;
    let elapsed = Duration::from_secs(u64::from(now.second())) + Duration::from_nanos(u64::from(nanos));
    MINUTE.saturating_sub(elapsed)
}
