//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dripback.
///
/// An empty backtest is not an error: see
/// [`BacktestOutcome::Empty`](crate::domain::backtest::BacktestOutcome::Empty).
#[derive(Debug, thiserror::Error)]
pub enum DripError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid price series: {reason}")]
    InvalidPriceSeries { reason: String },

    #[error("return is undefined for a total investment of zero")]
    DivisionUndefined,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no close on or after {date} to enter a lump-sum position")]
    NoEntryPrice { date: NaiveDate },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DripError {
    pub(crate) fn invalid_parameter(
        name: &str,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        DripError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&DripError> for std::process::ExitCode {
    fn from(err: &DripError) -> Self {
        let code: u8 = match err {
            DripError::Io(_) => 1,
            DripError::ConfigParse { .. }
            | DripError::ConfigMissing { .. }
            | DripError::ConfigInvalid { .. } => 2,
            DripError::Data { .. } | DripError::InvalidPriceSeries { .. } => 3,
            DripError::InvalidParameter { .. } => 4,
            DripError::NoEntryPrice { .. } => 5,
            DripError::DivisionUndefined => 6,
        };
        std::process::ExitCode::from(code)
    }
}
