//! Share accumulation over a contribution schedule.

use crate::domain::error::DripError;
use crate::domain::price_series::PriceSeries;
use crate::domain::resolver;
use chrono::NaiveDate;
use tracing::debug;

/// One filled contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRecord {
    pub scheduled_date: NaiveDate,
    pub execution_date: NaiveDate,
    pub price: f64,
    pub amount: f64,
    pub shares: f64,
    pub cumulative_shares: f64,
    pub cumulative_amount: f64,
}

/// Records in schedule order plus the number of periods that could not fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulation {
    pub records: Vec<InvestmentRecord>,
    pub dropped: usize,
}

impl Accumulation {
    /// True when nothing was bought; there is nothing to backtest.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_shares(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.cumulative_shares)
    }

    pub fn total_investment(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.cumulative_amount)
    }
}

pub fn validate_amount(amount: f64) -> Result<(), DripError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DripError::invalid_parameter(
            "amount",
            amount,
            "must be a positive number",
        ));
    }
    Ok(())
}

/// Buy `amount` worth of shares on every schedule date.
///
/// Dates resolve forward to the next trading day. Dates past the end of the
/// series are dropped. Two dates filling on the same trading day stay two
/// separate purchases.
pub fn accumulate(
    series: &PriceSeries,
    schedule: &[NaiveDate],
    amount: f64,
) -> Result<Accumulation, DripError> {
    validate_amount(amount)?;

    let mut acc = Accumulation::default();
    let mut cumulative_shares = 0.0;
    let mut cumulative_amount = 0.0;

    for &date in schedule {
        let Some(exec) = resolver::resolve(series, date) else {
            debug!(%date, "no trading day on or after scheduled date, dropping period");
            acc.dropped += 1;
            continue;
        };

        let shares = amount / exec.price;
        cumulative_shares += shares;
        cumulative_amount += amount;

        acc.records.push(InvestmentRecord {
            scheduled_date: exec.scheduled_date,
            execution_date: exec.execution_date,
            price: exec.price,
            amount,
            shares,
            cumulative_shares,
            cumulative_amount,
        });
    }

    Ok(acc)
}
