//! Date decomposition helpers callable by name from inside a condition.
//!
//! All helpers are total over a valid date and operate on the UTC calendar
//! representation of the transaction's timestamp, so rule evaluation is
//! deterministic regardless of the process timezone.

use chrono::{DateTime, Datelike, Utc};

/// Day of week, 0 = Sunday through 6 = Saturday.
pub fn day_of_week(date: DateTime<Utc>) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Calendar month, 1 through 12.
pub fn month(date: DateTime<Utc>) -> u32 {
    date.month()
}

pub fn year(date: DateTime<Utc>) -> i32 {
    date.year()
}

/// Day of month, 1 through 31.
pub fn day(date: DateTime<Utc>) -> u32 {
    date.day()
}

pub fn is_weekend(date: DateTime<Utc>) -> bool {
    matches!(day_of_week(date), 0 | 6)
}

/// ISO-8601 week number: weeks run Monday to Sunday and week 1 is the week
/// containing the year's first Thursday.
pub fn week_number(date: DateTime<Utc>) -> u32 {
    date.iso_week().week()
}
