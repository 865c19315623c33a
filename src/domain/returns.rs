//! Valuation, return metrics and lump-sum comparison.

use crate::domain::accumulation::InvestmentRecord;
use crate::domain::error::DripError;
use crate::domain::price_series::PriceSeries;
use crate::domain::resolver;
use chrono::NaiveDate;

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub records: Vec<InvestmentRecord>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub final_price: f64,
    pub final_value: f64,
    pub total_shares: f64,
    pub total_investment: f64,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
}

impl BacktestResult {
    pub fn investment_count(&self) -> usize {
        self.records.len()
    }

    /// Contribution per period, `None` when nothing was invested.
    pub fn amount_per_period(&self) -> Option<f64> {
        self.records.first().map(|r| r.amount)
    }

    /// Average price paid per share across all fills.
    pub fn average_cost(&self) -> f64 {
        if self.total_shares > 0.0 {
            self.total_investment / self.total_shares
        } else {
            0.0
        }
    }
}

/// DRIP result alongside a single purchase of the same total principal.
#[derive(Debug, Clone, PartialEq)]
pub struct LumpSumResult {
    pub drip: BacktestResult,
    pub lump_sum_date: NaiveDate,
    pub lump_sum_price: f64,
    pub lump_sum_shares: f64,
    pub lump_sum_value: f64,
    pub lump_sum_return_pct: f64,
    /// `drip.total_return_pct - lump_sum_return_pct`
    pub difference: f64,
}

impl LumpSumResult {
    pub fn drip_outperformed(&self) -> bool {
        self.difference > 0.0
    }
}

/// Percentage gain of `value` over `invested`.
pub fn total_return_pct(value: f64, invested: f64) -> Result<f64, DripError> {
    if invested == 0.0 {
        return Err(DripError::DivisionUndefined);
    }
    Ok((value - invested) / invested * 100.0)
}

/// Compound annual growth in percent; zero when the window is not positive.
pub fn annualized_return_pct(
    value: f64,
    invested: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<f64, DripError> {
    if invested == 0.0 {
        return Err(DripError::DivisionUndefined);
    }
    let years = (end_date - start_date).num_days() as f64 / DAYS_PER_YEAR;
    if years <= 0.0 {
        return Ok(0.0);
    }
    Ok(((value / invested).powf(1.0 / years) - 1.0) * 100.0)
}

/// Price held shares at `end_date` and derive return metrics.
///
/// The final price resolves backward from `end_date`. Empty `records` fail
/// with [`DripError::DivisionUndefined`]; check for an empty accumulation
/// first.
pub fn finalize(
    records: Vec<InvestmentRecord>,
    series: &PriceSeries,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<BacktestResult, DripError> {
    let Some(last) = records.last() else {
        return Err(DripError::DivisionUndefined);
    };
    let total_shares = last.cumulative_shares;
    let total_investment = last.cumulative_amount;

    // A non-empty record list implies a non-empty series.
    let final_price = resolver::resolve_valuation(series, end_date)
        .map(|p| p.close)
        .unwrap_or(last.price);
    let final_value = total_shares * final_price;

    let total_return_pct = total_return_pct(final_value, total_investment)?;
    let annualized_return_pct =
        annualized_return_pct(final_value, total_investment, start_date, end_date)?;

    Ok(BacktestResult {
        records,
        start_date,
        end_date,
        final_price,
        final_value,
        total_shares,
        total_investment,
        total_return_pct,
        annualized_return_pct,
    })
}

/// Compare dollar-cost averaging over `records` against investing the same
/// total principal once at the first close on or after `start_date`.
///
/// Both legs are marked at the same backward-resolved final price.
pub fn compare_to_lump_sum(
    records: Vec<InvestmentRecord>,
    series: &PriceSeries,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<LumpSumResult, DripError> {
    let drip = finalize(records, series, start_date, end_date)?;
    lump_sum_against(drip, series)
}

/// Lump-sum leg for an already finalized DRIP result.
pub fn lump_sum_against(
    drip: BacktestResult,
    series: &PriceSeries,
) -> Result<LumpSumResult, DripError> {
    if drip.total_investment == 0.0 {
        return Err(DripError::DivisionUndefined);
    }
    let entry = series
        .on_or_after(drip.start_date)
        .ok_or(DripError::NoEntryPrice {
            date: drip.start_date,
        })?;

    let lump_sum_shares = drip.total_investment / entry.close;
    let lump_sum_value = lump_sum_shares * drip.final_price;
    let lump_sum_return_pct = total_return_pct(lump_sum_value, drip.total_investment)?;
    let difference = drip.total_return_pct - lump_sum_return_pct;

    Ok(LumpSumResult {
        drip,
        lump_sum_date: entry.date,
        lump_sum_price: entry.close,
        lump_sum_shares,
        lump_sum_value,
        lump_sum_return_pct,
        difference,
    })
}
