// File: src/calendar.rs
//! Civil-date helpers shared by the recurrence engine and the view
//! projections.
//!
//! Every date in this crate is a plain `NaiveDate`: no time-of-day, no
//! timezone. Adding days or months therefore moves through the calendar
//! directly and can never land on a DST transition and shift the date.
//! `today()` is the only place the wall clock is consulted, and it reads
//! the *local* date so a user west of UTC does not see tomorrow's list.
use chrono::{Datelike, Days, Local, Months, NaiveDate};

/// The wire format for every date in the data model.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string. Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// `date` plus `n` calendar days; `n` may be negative. Rolls across month
/// and year boundaries.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let moved = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    // Only reachable at the edges of chrono's representable range.
    moved.unwrap_or(date)
}

/// `date` plus `n` months. When the target month is shorter than the source
/// day-of-month the result clamps to the last day of that month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n)).unwrap_or(date)
}

/// Signed whole days from `from` to `to` (positive when `to` is later).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Last day number of the month containing `date` (28..=31).
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 exists in every month");
    add_months(first, 1).pred_opt().map(|d| d.day()).unwrap_or(31)
}
