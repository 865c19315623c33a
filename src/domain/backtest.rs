//! Backtest driver: schedule, accumulate, finalize, compare.

use crate::domain::accumulation::accumulate;
use crate::domain::error::DripError;
use crate::domain::price_series::PriceSeries;
use crate::domain::returns::{self, BacktestResult, LumpSumResult};
use crate::domain::strategy::Strategy;
use tracing::{debug, info};

/// Result of a backtest invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BacktestOutcome {
    /// No scheduled contribution could be filled; nothing to backtest.
    Empty,
    Drip(BacktestResult),
    Compared(LumpSumResult),
}

impl BacktestOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, BacktestOutcome::Empty)
    }

    /// The DRIP leg, whether or not a comparison was requested.
    pub fn drip(&self) -> Option<&BacktestResult> {
        match self {
            BacktestOutcome::Empty => None,
            BacktestOutcome::Drip(result) => Some(result),
            BacktestOutcome::Compared(cmp) => Some(&cmp.drip),
        }
    }

    pub fn lump_sum(&self) -> Option<&LumpSumResult> {
        match self {
            BacktestOutcome::Compared(cmp) => Some(cmp),
            _ => None,
        }
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    strategy: &Strategy,
) -> Result<BacktestOutcome, DripError> {
    strategy.validate()?;

    let schedule = strategy.schedule()?;
    debug!(
        cadence = %strategy.cadence,
        periods = schedule.len(),
        "generated contribution schedule"
    );

    let accumulation = accumulate(series, &schedule, strategy.amount)?;
    if accumulation.is_empty() {
        info!(
            scheduled = schedule.len(),
            dropped = accumulation.dropped,
            "no contribution could be filled"
        );
        return Ok(BacktestOutcome::Empty);
    }

    info!(
        investments = accumulation.records.len(),
        dropped = accumulation.dropped,
        "accumulated contributions"
    );

    let result = returns::finalize(
        accumulation.records,
        series,
        strategy.start_date,
        strategy.end_date,
    )?;

    if !strategy.compare_to_lump_sum {
        return Ok(BacktestOutcome::Drip(result));
    }
    let cmp = returns::lump_sum_against(result, series)?;
    Ok(BacktestOutcome::Compared(cmp))
}
