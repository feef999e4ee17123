//! Working-day calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The whole calendar month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start,
            end: next.pred_opt()?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Monday to Friday. Public holidays are not considered.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Working days of a period in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCalendar {
    period: Period,
    days: Vec<NaiveDate>,
}

impl WorkingCalendar {
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Iterate the working days; may be called any number of times.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Collect the working days in `[start, end]`. Empty when `end < start`.
pub fn compute_working_days(start: NaiveDate, end: NaiveDate) -> WorkingCalendar {
    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d))
        .collect();

    WorkingCalendar {
        period: Period::new(start, end),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_week_has_five_days() {
        // Wednesday to Tuesday
        let calendar = compute_working_days(date(2025, 1, 1), date(2025, 1, 7));
        assert_eq!(calendar.len(), 5);
        assert!(calendar.iter().all(is_working_day));
    }

    #[test]
    fn test_days_ascending() {
        let calendar = compute_working_days(date(2025, 3, 1), date(2025, 3, 31));
        assert_eq!(calendar.len(), 21);
        assert!(calendar.days().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(calendar.days().first(), Some(&date(2025, 3, 3)));
        assert_eq!(calendar.days().last(), Some(&date(2025, 3, 31)));
    }

    #[test]
    fn test_iteration_restartable() {
        let calendar = compute_working_days(date(2025, 3, 1), date(2025, 3, 14));
        let first: Vec<_> = calendar.iter().collect();
        let second: Vec<_> = calendar.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn test_weekend_only_period() {
        let calendar = compute_working_days(date(2025, 3, 1), date(2025, 3, 2));
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_reversed_period_is_empty() {
        let calendar = compute_working_days(date(2025, 3, 10), date(2025, 3, 3));
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_single_day() {
        let calendar = compute_working_days(date(2025, 3, 3), date(2025, 3, 3));
        assert_eq!(calendar.days(), &[date(2025, 3, 3)]);
    }

    #[test]
    fn test_month_period() {
        let feb = Period::month(2024, 2).unwrap();
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 2, 29));

        let dec = Period::month(2025, 12).unwrap();
        assert_eq!(dec.end, date(2025, 12, 31));

        assert!(Period::month(2025, 13).is_none());
    }

    #[test]
    fn test_period_contains() {
        let period = Period::new(date(2025, 3, 1), date(2025, 3, 31));
        assert!(period.contains(date(2025, 3, 1)));
        assert!(period.contains(date(2025, 3, 31)));
        assert!(!period.contains(date(2025, 4, 1)));
    }
}
