//! Budget period math
//!
//! Budgets govern an inclusive `[start, end]` date window. This module holds
//! the pure interval arithmetic used by the progress calculator and the
//! overlap validator, plus the calendar windows for each period kind.
//!
//! Dates are taken at midnight. `now` is always passed in explicitly so every
//! function here is deterministic.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Cadence a budget is defined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    #[default]
    Monthly,
    Weekly,
    Daily,
}

impl PeriodKind {
    /// The calendar window of this kind containing `date`
    ///
    /// Monthly is the calendar month, weekly the ISO week (Monday to Sunday),
    /// daily the date itself.
    pub fn window_containing(&self, date: NaiveDate) -> DateRange {
        match self {
            Self::Monthly => {
                let start = date - Duration::days(i64::from(date.day0()));
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                DateRange { start, end }
            }
            Self::Weekly => {
                let start =
                    date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                DateRange {
                    start,
                    end: start + Duration::days(6),
                }
            }
            Self::Daily => DateRange {
                start: date,
                end: date,
            },
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Weekly => write!(f, "weekly"),
            Self::Daily => write!(f, "daily"),
        }
    }
}

impl FromStr for PeriodKind {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "weekly" | "week" | "w" => Ok(Self::Weekly),
            "daily" | "day" | "d" => Ok(Self::Daily),
            other => Err(PeriodParseError::UnknownKind(other.to_string())),
        }
    }
}

/// An inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a window, rejecting one that ends before it starts
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodParseError> {
        if end < start {
            return Err(PeriodParseError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }

    /// Number of calendar days in the window, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days_elapsed(&self, now: NaiveDateTime) -> i64 {
        days_elapsed(self.start, now)
    }

    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        days_remaining(self.end, now)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// True iff the inclusive intervals share at least one day
///
/// A window ending on the day another starts overlaps it.
pub fn intervals_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Whole days from `start` to `now`, rounded up, never below 1
pub fn days_elapsed(start: NaiveDate, now: NaiveDateTime) -> i64 {
    ceil_days(now - start.and_time(NaiveTime::MIN)).max(1)
}

/// Whole days from `now` to `end`, rounded up, never below 0
pub fn days_remaining(end: NaiveDate, now: NaiveDateTime) -> i64 {
    ceil_days(end.and_time(NaiveTime::MIN) - now).max(0)
}

fn ceil_days(delta: Duration) -> i64 {
    let millis = delta.num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) > 0)
}

/// Error type for period parsing and validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownKind(String),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind(s) => {
                write!(f, "Unknown period kind '{}' (use monthly, weekly or daily)", s)
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_overlap_shared_boundary_day() {
        assert!(intervals_overlap(
            date(2025, 1, 1),
            date(2025, 1, 31),
            date(2025, 1, 31),
            date(2025, 2, 28)
        ));
        assert!(!intervals_overlap(
            date(2025, 1, 1),
            date(2025, 1, 30),
            date(2025, 1, 31),
            date(2025, 2, 28)
        ));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let days: Vec<NaiveDate> = (1..=10).map(|d| date(2025, 3, d)).collect();
        for &a_start in &days {
            for &a_end in days.iter().filter(|d| **d >= a_start) {
                for &b_start in &days {
                    for &b_end in days.iter().filter(|d| **d >= b_start) {
                        assert_eq!(
                            intervals_overlap(a_start, a_end, b_start, b_end),
                            intervals_overlap(b_start, b_end, a_start, a_end)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_overlap_containment() {
        let outer = DateRange::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();
        let inner = DateRange::new(date(2025, 6, 1), date(2025, 6, 30)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_days_elapsed_rounds_up_partial_days() {
        assert_eq!(days_elapsed(date(2025, 8, 1), at(2025, 8, 16, 12)), 16);
        assert_eq!(days_elapsed(date(2025, 8, 1), at(2025, 8, 16, 0)), 15);
    }

    #[test]
    fn test_days_elapsed_floors_at_one() {
        assert_eq!(days_elapsed(date(2025, 8, 1), at(2025, 8, 1, 0)), 1);
        assert_eq!(days_elapsed(date(2025, 8, 10), at(2025, 8, 1, 9)), 1);
    }

    #[test]
    fn test_days_remaining() {
        assert_eq!(days_remaining(date(2025, 8, 31), at(2025, 8, 16, 12)), 15);
        assert_eq!(days_remaining(date(2025, 8, 31), at(2025, 8, 31, 0)), 0);
        assert_eq!(days_remaining(date(2025, 8, 31), at(2025, 9, 5, 8)), 0);
    }

    #[test]
    fn test_monthly_window() {
        let window = PeriodKind::Monthly.window_containing(date(2024, 2, 14));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));

        let december = PeriodKind::Monthly.window_containing(date(2025, 12, 31));
        assert_eq!(december.start, date(2025, 12, 1));
        assert_eq!(december.end, date(2025, 12, 31));
        assert_eq!(december.len_days(), 31);
    }

    #[test]
    fn test_weekly_window_is_iso_week() {
        // 2025-08-13 is a Wednesday
        let window = PeriodKind::Weekly.window_containing(date(2025, 8, 13));
        assert_eq!(window.start, date(2025, 8, 11));
        assert_eq!(window.end, date(2025, 8, 17));
    }

    #[test]
    fn test_daily_window() {
        let window = PeriodKind::Daily.window_containing(date(2025, 8, 13));
        assert_eq!(window.len_days(), 1);
        assert!(window.contains(date(2025, 8, 13)));
    }

    #[test]
    fn test_range_rejects_end_before_start() {
        assert!(matches!(
            DateRange::new(date(2025, 2, 1), date(2025, 1, 31)),
            Err(PeriodParseError::EndBeforeStart { .. })
        ));
        assert!(DateRange::new(date(2025, 2, 1), date(2025, 2, 1)).is_ok());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Monthly".parse::<PeriodKind>().unwrap(), PeriodKind::Monthly);
        assert_eq!("week".parse::<PeriodKind>().unwrap(), PeriodKind::Weekly);
        assert!("yearly".parse::<PeriodKind>().is_err());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&PeriodKind::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
    }
}
