//! CSV file price adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row.
//! Symbols are matched against file names without regard to case. The
//! date is read from a `date` column (or the first column) and the price
//! from `close`, falling back to `adj close`. Trailing time components such
//! as `2023-01-03 00:00:00-05:00` are ignored.

use crate::domain::error::DripError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<symbol>.csv` if it exists, else a `.csv` file whose stem matches
    /// `symbol` ignoring case. Falls back to the exact name so read errors
    /// still point at the expected file.
    fn csv_path(&self, symbol: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", symbol));
        if exact.is_file() {
            return exact;
        }
        let Ok(entries) = fs::read_dir(&self.base_path) else {
            return exact;
        };
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.extension() == Some(OsStr::new("csv"))
                    && path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(symbol))
            })
            .unwrap_or(exact)
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, DripError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("date").unwrap_or(0);
        let close = find("close")
            .or_else(|| find("adj close"))
            .ok_or_else(|| DripError::Data {
                reason: "missing close column".into(),
            })?;
        Ok(Columns { date, close })
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, DripError> {
        let raw = raw.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| DripError::Data {
            reason: format!("invalid date '{}': {}", raw, e),
        })
    }

    /// All `(date, close)` rows of a symbol's file, unfiltered.
    fn read_points(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>, DripError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DripError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DripError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Self::locate_columns(headers)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DripError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).ok_or_else(|| DripError::Data {
                reason: "missing date column".into(),
            })?;
            let date = Self::parse_date(date_str)?;

            let close_str = record.get(columns.close).ok_or_else(|| DripError::Data {
                reason: format!("missing close value on {}", date),
            })?;
            let close: f64 = close_str.trim().parse().map_err(|e| DripError::Data {
                reason: format!("invalid close value on {}: {}", date, e),
            })?;

            points.push((date, close));
        }

        debug!(symbol, rows = points.len(), path = %path.display(), "read price file");
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DripError> {
        let points = self
            .read_points(symbol)?
            .into_iter()
            .filter(|(date, _)| *date >= start_date && *date <= end_date);
        PriceSeries::from_points(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DripError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DripError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DripError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let series = PriceSeries::from_points(self.read_points(symbol)?)?;
        Ok(series.date_range())
    }
}
