//! CSV price file adapter.
//!
//! Reads daily OHLCV bars from a single CSV file with a header row. Column
//! positions are resolved from the header names (case-insensitive), so
//! `Date,Open,High,Low,Close,Volume` and `date,open,...` both work. Rows
//! are sorted by date after filtering, then handed to [`PriceSeries::new`]
//! which enforces strictly increasing dates.

use crate::domain::error::AlgoBlocksError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn data_file_error(&self, reason: String) -> AlgoBlocksError {
        AlgoBlocksError::DataFile {
            file: self.path.display().to_string(),
            reason,
        }
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AlgoBlocksError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| self.data_file_error(format!("failed to read: {e}")))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| self.data_file_error(format!("CSV header error: {e}")))?
            .clone();

        let index_of = |name: &str| {
            column_index(&headers, name)
                .ok_or_else(|| self.data_file_error(format!("missing column '{name}'")))
        };
        let date_col = index_of("date")?;
        let open_col = index_of("open")?;
        let high_col = index_of("high")?;
        let low_col = index_of("low")?;
        let close_col = index_of("close")?;
        let volume_col = index_of("volume")?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| self.data_file_error(format!("CSV parse error: {e}")))?;

            let field = |col: usize, name: &str| {
                record.get(col).map(str::trim).ok_or_else(|| {
                    self.data_file_error(format!("row {}: missing {name} field", row + 2))
                })
            };

            let date = NaiveDate::parse_from_str(field(date_col, "date")?, "%Y-%m-%d")
                .map_err(|e| self.data_file_error(format!("row {}: invalid date: {e}", row + 2)))?;

            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            let number = |col: usize, name: &str| -> Result<f64, AlgoBlocksError> {
                field(col, name)?.parse().map_err(|e| {
                    self.data_file_error(format!("row {}: invalid {name} value: {e}", row + 2))
                })
            };

            bars.push(PriceBar {
                date,
                open: number(open_col, "open")?,
                high: number(high_col, "high")?,
                low: number(low_col, "low")?,
                close: number(close_col, "close")?,
                volume: field(volume_col, "volume")?.parse().map_err(|e| {
                    self.data_file_error(format!("row {}: invalid volume value: {e}", row + 2))
                })?,
            });
        }

        bars.sort_by_key(|b| b.date);
        PriceSeries::new(bars).map_err(AlgoBlocksError::Data)
    }
}
