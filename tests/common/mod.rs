#![allow(dead_code)]

use chrono::NaiveDate;
use dripback::domain::error::DripError;
use dripback::domain::price_series::PriceSeries;
use dripback::domain::strategy::{Cadence, Strategy};
use dripback::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DripError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DripError::Data {
                reason: reason.clone(),
            });
        }
        let closes = self.data.get(symbol).cloned().unwrap_or_default();
        PriceSeries::from_points(
            closes
                .into_iter()
                .filter(|(d, _)| *d >= start_date && *d <= end_date),
        )
    }

    fn list_symbols(&self) -> Result<Vec<String>, DripError> {
        let mut symbols: Vec<_> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripError> {
        match self.data.get(symbol) {
            Some(closes) => Ok(PriceSeries::from_points(closes.clone())?.date_range()),
            None => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ten trading days, 2023-01-02 (Mon) to 2023-01-13 (Fri).
pub fn reference_closes() -> Vec<(NaiveDate, f64)> {
    [
        (2, 100.0),
        (3, 102.0),
        (4, 105.0),
        (5, 103.0),
        (6, 106.0),
        (9, 110.0),
        (10, 108.0),
        (11, 112.0),
        (12, 115.0),
        (13, 114.0),
    ]
    .iter()
    .map(|&(d, c)| (date(2023, 1, d), c))
    .collect()
}

pub fn reference_series() -> PriceSeries {
    PriceSeries::from_points(reference_closes()).unwrap()
}

/// Weekday closes from `start` for `count` trading days, rising by `step`.
pub fn generate_weekday_closes(
    start: NaiveDate,
    count: usize,
    start_price: f64,
    step: f64,
) -> Vec<(NaiveDate, f64)> {
    use chrono::Datelike;
    start
        .iter_days()
        .filter(|d| d.weekday().num_days_from_monday() < 5)
        .take(count)
        .enumerate()
        .map(|(i, d)| (d, start_price + step * i as f64))
        .collect()
}

pub fn weekly_strategy(start: NaiveDate, end: NaiveDate) -> Strategy {
    Strategy {
        cadence: Cadence::Weekly { weekday: 0 },
        amount: 100.0,
        start_date: start,
        end_date: end,
        compare_to_lump_sum: true,
    }
}
