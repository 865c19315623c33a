//! Contribution strategy selection.

use crate::domain::accumulation::validate_amount;
use crate::domain::error::DripError;
use crate::domain::schedule;
use chrono::NaiveDate;
use std::fmt;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// How often a contribution is made and on which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// `weekday` counts from 0 = Monday.
    Weekly { weekday: u8 },
    Monthly { day_of_month: u8 },
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::Weekly { weekday: 0 }
    }
}

impl Cadence {
    pub fn validate(&self) -> Result<(), DripError> {
        match *self {
            Cadence::Weekly { weekday } => schedule::validate_weekday(weekday),
            Cadence::Monthly { day_of_month } => schedule::validate_day_of_month(day_of_month),
        }
    }

    /// Contribution dates in `[start, end]`.
    pub fn dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, DripError> {
        match *self {
            Cadence::Weekly { weekday } => schedule::weekly_dates(start, end, weekday),
            Cadence::Monthly { day_of_month } => {
                schedule::monthly_dates(start, end, day_of_month)
            }
        }
    }

    /// Singular period noun, "week" or "month".
    pub fn period_unit(&self) -> &'static str {
        match self {
            Cadence::Weekly { .. } => "week",
            Cadence::Monthly { .. } => "month",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cadence::Weekly { weekday } => match WEEKDAY_NAMES.get(weekday as usize) {
                Some(name) => write!(f, "weekly on {}", name),
                None => write!(f, "weekly on day {}", weekday),
            },
            Cadence::Monthly { day_of_month } => {
                write!(f, "monthly on day {}", day_of_month)
            }
        }
    }
}

/// Parse a weekday as `0`-`6` or an English name (`mon`, `Monday`).
pub fn parse_weekday(value: &str) -> Option<u8> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u8>() {
        return Some(n);
    }
    let lower = value.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    WEEKDAY_NAMES
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower))
        .map(|i| i as u8)
}

/// A full backtest request.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub cadence: Cadence,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub compare_to_lump_sum: bool,
}

impl Strategy {
    pub fn validate(&self) -> Result<(), DripError> {
        self.cadence.validate()?;
        validate_amount(self.amount)?;
        Ok(())
    }

    pub fn schedule(&self) -> Result<Vec<NaiveDate>, DripError> {
        self.cadence.dates(self.start_date, self.end_date)
    }
}
