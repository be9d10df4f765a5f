//! Conversion between fractional-day intervals and absolute timestamps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::SrsError;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Compute the next due date from an interval in days.
///
/// Intervals of one day or more are rounded up to whole days; shorter ones
/// are applied as `interval * 24` hours, to the millisecond.
///
/// # Examples
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use parla_srs::resolve_due_date;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// assert_eq!(resolve_due_date(2.3, now).unwrap(), now + Duration::days(3));
/// assert_eq!(resolve_due_date(0.5, now).unwrap(), now + Duration::hours(12));
/// ```
pub fn resolve_due_date(interval: f64, now: DateTime<Utc>) -> Result<DateTime<Utc>, SrsError> {
    if !interval.is_finite() || interval < 0.0 {
        return Err(SrsError::InvalidInterval(interval));
    }

    let offset = if interval >= 1.0 {
        let days = interval.ceil();
        if days > i64::MAX as f64 {
            return Err(SrsError::DueDateOverflow(interval));
        }
        Duration::try_days(days as i64)
    } else {
        Duration::try_milliseconds((interval * 24.0 * 3_600_000.0).round() as i64)
    };

    offset
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or(SrsError::DueDateOverflow(interval))
}

/// Unit in which lateness is expressed to the engine.
///
/// The engine's thresholds (`-0.1`, `0.1`, the cap at `1.0`) were written
/// against hours since the due date. `IntervalFraction` expresses the same
/// distance as a fraction of the card's interval instead, which keeps an
/// early review in `[-1, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatenessUnit {
    #[default]
    Hours,
    IntervalFraction,
}

/// Signed lateness of a review happening at `now` for a card due at `due_date`.
///
/// Cards that were never scheduled are treated as exactly on time.
pub fn compute_lateness(
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: f64,
    unit: LatenessUnit,
) -> f64 {
    let Some(due_date) = due_date else {
        return 0.0;
    };

    let hours = (now - due_date).num_milliseconds() as f64 / 3_600_000.0;
    match unit {
        LatenessUnit::Hours => hours,
        LatenessUnit::IntervalFraction if interval > 0.0 => hours / 24.0 / interval,
        LatenessUnit::IntervalFraction => hours / 24.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_sub_day_interval_uses_hours() {
        let due = resolve_due_date(30.0 / 1440.0, now()).unwrap();
        assert_eq!(due - now(), Duration::minutes(30));

        let due = resolve_due_date(0.5, now()).unwrap();
        assert_eq!(due - now(), Duration::hours(12));
    }

    #[test]
    fn test_multi_day_interval_rounds_up() {
        assert_eq!(resolve_due_date(1.0, now()).unwrap(), now() + Duration::days(1));
        assert_eq!(resolve_due_date(1.01, now()).unwrap(), now() + Duration::days(2));
        assert_eq!(resolve_due_date(16.8, now()).unwrap(), now() + Duration::days(17));
    }

    #[test]
    fn test_fixed_clock_is_repeatable() {
        let clock = FixedClock(now());
        let first = resolve_due_date(6.0, clock.now()).unwrap();
        let second = resolve_due_date(6.0, clock.now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert_eq!(
            resolve_due_date(-1.0, now()),
            Err(SrsError::InvalidInterval(-1.0))
        );
        assert!(resolve_due_date(f64::NAN, now()).is_err());
        assert!(matches!(
            resolve_due_date(1e300, now()),
            Err(SrsError::DueDateOverflow(_))
        ));
    }

    #[test]
    fn test_lateness_in_hours() {
        let due = now() - Duration::hours(6);
        assert_eq!(compute_lateness(Some(due), now(), 2.0, LatenessUnit::Hours), 6.0);

        let due = now() + Duration::minutes(30);
        assert_eq!(compute_lateness(Some(due), now(), 2.0, LatenessUnit::Hours), -0.5);
    }

    #[test]
    fn test_lateness_as_interval_fraction() {
        // reviewed one day early on a four-day interval
        let due = now() + Duration::days(1);
        let lateness = compute_lateness(Some(due), now(), 4.0, LatenessUnit::IntervalFraction);
        assert!((lateness + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unscheduled_card_is_on_time() {
        assert_eq!(compute_lateness(None, now(), 0.0, LatenessUnit::Hours), 0.0);
    }
}
