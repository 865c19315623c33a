//! Contribution schedule generation for weekly and monthly cadences.

use crate::domain::error::DripError;
use chrono::{Datelike, Duration, NaiveDate};

pub const MAX_WEEKDAY: u8 = 6;
pub const MAX_DAY_OF_MONTH: u8 = 31;

pub fn validate_weekday(weekday: u8) -> Result<(), DripError> {
    if weekday > MAX_WEEKDAY {
        return Err(DripError::invalid_parameter(
            "weekday",
            weekday,
            "must be between 0 (Monday) and 6 (Sunday)",
        ));
    }
    Ok(())
}

pub fn validate_day_of_month(day_of_month: u8) -> Result<(), DripError> {
    if day_of_month == 0 || day_of_month > MAX_DAY_OF_MONTH {
        return Err(DripError::invalid_parameter(
            "day_of_month",
            day_of_month,
            "must be between 1 and 31",
        ));
    }
    Ok(())
}

/// Every `weekday` (0 = Monday) in `[start, end]`, seven days apart.
pub fn weekly_dates(
    start: NaiveDate,
    end: NaiveDate,
    weekday: u8,
) -> Result<Vec<NaiveDate>, DripError> {
    validate_weekday(weekday)?;

    let current = start.weekday().num_days_from_monday() as i64;
    let offset = (weekday as i64 - current).rem_euclid(7);

    let mut dates = Vec::new();
    let mut next = start.checked_add_signed(Duration::days(offset));
    while let Some(date) = next.filter(|d| *d <= end) {
        dates.push(date);
        next = date.checked_add_signed(Duration::days(7));
    }
    Ok(dates)
}

/// `day_of_month` of every month touching `[start, end]`.
///
/// Months where the day does not exist (31 in April, 30 in February) are
/// skipped rather than clamped.
pub fn monthly_dates(
    start: NaiveDate,
    end: NaiveDate,
    day_of_month: u8,
) -> Result<Vec<NaiveDate>, DripError> {
    validate_day_of_month(day_of_month)?;

    let mut dates = Vec::new();
    if start > end {
        return Ok(dates);
    }

    let (mut year, mut month) = (start.year(), start.month());
    let last = (end.year(), end.month());
    while (year, month) <= last {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day_of_month as u32) {
            if date >= start && date <= end {
                dates.push(date);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(dates)
}
