//! Mapping nominal dates onto trading days.
//!
//! Purchases resolve forward: an order scheduled on a non-trading day fills
//! at the next open. Valuations resolve backward: a portfolio is marked at
//! the most recent close. The two are separate functions on purpose and must
//! not be swapped.

use crate::domain::price_series::{PricePoint, PriceSeries};
use chrono::NaiveDate;

/// Where a scheduled contribution actually fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Execution {
    pub scheduled_date: NaiveDate,
    pub execution_date: NaiveDate,
    pub price: f64,
}

/// Forward resolution for purchases.
///
/// `None` means no trading day exists on or after `date`; the period is
/// dropped by the caller.
pub fn resolve(series: &PriceSeries, date: NaiveDate) -> Option<Execution> {
    series.on_or_after(date).map(|point| Execution {
        scheduled_date: date,
        execution_date: point.date,
        price: point.close,
    })
}

/// Backward resolution for valuation.
///
/// Close on `date`, else the latest close before it, else the last close in
/// the series. `None` only for an empty series.
pub fn resolve_valuation(series: &PriceSeries, date: NaiveDate) -> Option<PricePoint> {
    series.on_or_before(date).or_else(|| series.last())
}
