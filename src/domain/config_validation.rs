//! Configuration validation.
//!
//! Checks every field present in the config before a backtest runs. Keys
//! that may be supplied on the command line instead (symbol, cadence
//! parameters, amount) are only checked when present.

use crate::domain::error::DripError;
use crate::domain::schedule::{validate_day_of_month, validate_weekday};
use crate::domain::strategy::parse_weekday;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DripError> {
    validate_config_except(config, &[])
}

/// Like [`validate_config`], skipping `(section, key)` pairs whose value is
/// supplied elsewhere, such as on the command line.
pub fn validate_config_except(
    config: &dyn ConfigPort,
    replaced: &[(&str, &str)],
) -> Result<(), DripError> {
    let present = |section: &str, key: &str| {
        if replaced.iter().any(|&(s, k)| s == section && k == key) {
            None
        } else {
            config.get_string(section, key)
        }
    };

    validate_data_path(config)?;
    validate_dates(config)?;
    validate_amount(present("backtest", "amount"))?;
    validate_strategy(
        present("strategy", "cadence"),
        present("strategy", "weekday"),
        present("strategy", "day_of_month"),
    )?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DripError {
    DripError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), DripError> {
    if config.has_key("data", "path") {
        return Ok(());
    }
    Err(DripError::ConfigMissing {
        section: "data".to_string(),
        key: "path".to_string(),
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DripError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date > end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

/// Required `[backtest]` date in `YYYY-MM-DD` form.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, DripError> {
    match config.get_string("backtest", key) {
        None => Err(DripError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|_| {
            invalid(
                "backtest",
                key,
                format!("invalid {} format, expected YYYY-MM-DD", key),
            )
        }),
    }
}

fn validate_amount(amount: Option<String>) -> Result<(), DripError> {
    let Some(raw) = amount else {
        return Ok(());
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(invalid("backtest", "amount", "amount must be a positive number")),
    }
}

fn validate_strategy(
    cadence: Option<String>,
    weekday: Option<String>,
    day_of_month: Option<String>,
) -> Result<(), DripError> {
    if let Some(cadence) = cadence {
        if !matches!(cadence.to_lowercase().as_str(), "weekly" | "monthly") {
            return Err(invalid(
                "strategy",
                "cadence",
                "cadence must be weekly or monthly",
            ));
        }
    }

    if let Some(raw) = weekday {
        let weekday = parse_weekday(&raw).ok_or_else(|| {
            invalid("strategy", "weekday", "expected 0-6 or a day name")
        })?;
        validate_weekday(weekday)
            .map_err(|_| invalid("strategy", "weekday", "weekday must be between 0 and 6"))?;
    }

    if let Some(raw) = day_of_month {
        let day: u8 = raw.parse().map_err(|_| {
            invalid("strategy", "day_of_month", "day_of_month must be an integer")
        })?;
        validate_day_of_month(day).map_err(|_| {
            invalid(
                "strategy",
                "day_of_month",
                "day_of_month must be between 1 and 31",
            )
        })?;
    }

    Ok(())
}
