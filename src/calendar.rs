//! Business-day calendar.
//!
//! Counts working days (Monday–Friday) in a closed date range and converts
//! them to hours at a fixed rate.
//!
//! # Precedence
//! Holidays override weekdays. A date is a business day iff:
//! - It falls on Monday through Friday, AND
//! - It is NOT listed in `holidays`.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Working-time calendar for effort metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    /// Hours credited per business day.
    pub hours_per_day: u32,
    /// Non-working dates (override weekdays).
    pub holidays: Vec<NaiveDate>,
}

impl BusinessCalendar {
    /// Creates a Monday–Friday calendar.
    pub fn new(hours_per_day: u32) -> Self {
        Self {
            hours_per_day,
            holidays: Vec::new(),
        }
    }

    /// Adds a non-working date.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.push(date);
        self
    }

    /// Whether `date` is a business day.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        is_weekday(date) && !self.holidays.contains(&date)
    }

    /// Business days in `[start, end]`, both inclusive.
    ///
    /// Returns 0 if `end` precedes `start`.
    pub fn business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }

        let span = (end - start).num_days() + 1;
        let full_weeks = span / 7;
        let mut days = full_weeks * 5;

        // Walk the remaining partial week.
        let offset = start.weekday().num_days_from_monday() as i64;
        for i in 0..(span % 7) {
            if (offset + i) % 7 < 5 {
                days += 1;
            }
        }

        let mut holidays: Vec<NaiveDate> = self
            .holidays
            .iter()
            .copied()
            .filter(|h| *h >= start && *h <= end && is_weekday(*h))
            .collect();
        holidays.sort();
        holidays.dedup();

        (days - holidays.len() as i64).max(0) as u32
    }

    /// Hours credited for `[start, end]`, saturating at `u32::MAX`.
    pub fn hours(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        self.business_days(start, end).saturating_mul(self.hours_per_day)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(8)
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
