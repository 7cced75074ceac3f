//! Month-granular rate periods.
//!
//! FX rates for consolidation are published per closing month, so every
//! lookup is keyed by the first day of the month.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Returns the first day of `date`'s month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// Returns the rate period containing `as_of`, evaluated in UTC.
#[must_use]
pub fn period_of(as_of: DateTime<Utc>) -> NaiveDate {
    month_start(as_of.date_naive())
}
