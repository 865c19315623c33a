//! Price history access port.

use crate::domain::error::DripError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `symbol` within `[start_date, end_date]`.
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DripError>;

    fn list_symbols(&self) -> Result<Vec<String>, DripError>;

    /// `(first date, last date, trading days)` of all stored history.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripError>;
}
