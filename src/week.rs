//! ISO week arithmetic for the weekly board.
//!
//! Weeks start on Monday; week 1 is the week containing the year's first
//! Thursday. Week numbers are kept in [1, 52] everywhere: week 53 is not
//! modeled, and year wrap goes 52 -> 1.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// ISO-8601 week number of a date, via the Thursday-shift rule: move the
/// date to the Thursday of its week, then count weeks from January 1 of
/// the Thursday's year.
pub fn week_number_of(date: NaiveDate) -> u32 {
    let day_num = i64::from(date.weekday().number_from_monday());
    let thursday = date + Duration::days(4 - day_num);
    let year_start = NaiveDate::from_ymd_opt(thursday.year(), 1, 1).unwrap();
    let days_since_start = (thursday - year_start).num_days();
    // ceil((days_since_start + 1) / 7)
    ((days_since_start + 7) / 7) as u32
}

/// Monday of the given week, anchored on January 4 (always in ISO week 1).
///
/// This mirrors the board's original approximation and is not a strict
/// inverse of `week_number_of` at year boundaries.
pub fn monday_of(week_number: u32, year: i32) -> NaiveDate {
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4).unwrap();
    let jan4_day = i64::from(jan4.weekday().number_from_monday());
    let first_monday = jan4 - Duration::days(jan4_day - 1);
    first_monday + Duration::days(i64::from(week_number - 1) * 7)
}

/// Current week number paired with the calendar year of today.
pub fn current_week() -> (u32, i32) {
    let today = Local::now().date_naive();
    (week_number_of(today), today.year())
}

/// Week before the given one, wrapping 1 -> 52 of the previous year.
pub fn previous_week(week_number: u32, year: i32) -> (u32, i32) {
    if week_number > 1 {
        (week_number - 1, year)
    } else {
        (52, year - 1)
    }
}

/// Week after the given one, wrapping 52 -> 1 of the next year.
pub fn next_week(week_number: u32, year: i32) -> (u32, i32) {
    if week_number < 52 {
        (week_number + 1, year)
    } else {
        (1, year + 1)
    }
}

/// Display label for a week, e.g. "S46".
pub fn format_week(week_number: u32) -> String {
    format!("S{week_number}")
}
