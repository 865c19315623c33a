//! Daily closing-price history for a single symbol.

use crate::domain::error::DripError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A single trading day's closing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Trading date to closing price, strictly increasing by date.
///
/// Gaps (weekends, holidays) are left as gaps; callers pick a resolution
/// policy through [`crate::domain::resolver`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from `(date, close)` pairs in any order.
    ///
    /// Duplicate dates and non-positive or non-finite closes are rejected.
    pub fn from_points<I>(points: I) -> Result<Self, DripError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut closes = BTreeMap::new();
        for (date, close) in points {
            if !close.is_finite() || close <= 0.0 {
                return Err(DripError::InvalidPriceSeries {
                    reason: format!("close on {} must be positive, got {}", date, close),
                });
            }
            if closes.insert(date, close).is_some() {
                return Err(DripError::InvalidPriceSeries {
                    reason: format!("duplicate trading date {}", date),
                });
            }
        }
        Ok(Self { closes })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Close on exactly `date`, if it was a trading day.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    pub fn first(&self) -> Option<PricePoint> {
        self.closes
            .first_key_value()
            .map(|(&date, &close)| PricePoint { date, close })
    }

    pub fn last(&self) -> Option<PricePoint> {
        self.closes
            .last_key_value()
            .map(|(&date, &close)| PricePoint { date, close })
    }

    /// Earliest trading day on or after `date`.
    pub fn on_or_after(&self, date: NaiveDate) -> Option<PricePoint> {
        self.closes
            .range(date..)
            .next()
            .map(|(&date, &close)| PricePoint { date, close })
    }

    /// Latest trading day on or before `date`.
    pub fn on_or_before(&self, date: NaiveDate) -> Option<PricePoint> {
        self.closes
            .range(..=date)
            .next_back()
            .map(|(&date, &close)| PricePoint { date, close })
    }

    pub fn iter(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.closes
            .iter()
            .map(|(&date, &close)| PricePoint { date, close })
    }

    /// `(first date, last date, number of trading days)`.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate, usize)> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, self.len())),
            _ => None,
        }
    }
}
