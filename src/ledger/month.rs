use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    pub year: i32,
    /// 1-based month, January = 1.
    pub month: u32,
}

impl MonthRef {
    /// Builds a month from caller-supplied parts, validating the calendar range.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidInput(format!(
                "month: must be 1-12, got {month}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::InvalidInput(format!(
                "year: must be {MIN_YEAR}-{MAX_YEAR}, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Truncates a date to its calendar month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// The following calendar month, carrying the year past December.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `months` steps ahead of this one.
    pub fn plus(&self, months: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short presentation label, e.g. `Mar/24`.
    pub fn label(&self) -> String {
        self.first_day().format("%b/%y").to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A half-open date range `[start, end)` for transaction filtering.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(LedgerError::InvalidInput(
                "window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Adds calendar months to a date, clamping the day-of-month when the target
/// month is shorter. The clamp is per call, so a day lost to a short month is
/// restored in later months that can hold it. Callers keep `months` small
/// enough that the target month stays inside the supported calendar range.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let mut year = date.year() + (months / 12) as i32;
    let mut month = date.month() + (months % 12);
    if month > 12 {
        month -= 12;
        year += 1;
    }
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}
