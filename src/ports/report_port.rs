//! Backtest report port.

use crate::domain::backtest::BacktestOutcome;
use crate::domain::error::DripError;
use crate::domain::strategy::Strategy;
use std::io::Write;

/// Header information shown alongside a result.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub strategy: &'a Strategy,
}

/// Port for rendering a backtest outcome.
pub trait ReportPort {
    fn write(
        &self,
        outcome: &BacktestOutcome,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> Result<(), DripError>;

    /// Default implementation: render into a `String`.
    fn render(
        &self,
        outcome: &BacktestOutcome,
        ctx: &ReportContext<'_>,
    ) -> Result<String, DripError> {
        let mut buf = Vec::new();
        self.write(outcome, ctx, &mut buf)?;
        String::from_utf8(buf).map_err(|e| DripError::Io(std::io::Error::other(e)))
    }
}
