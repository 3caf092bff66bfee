//! Bar-aligned named column table.
//!
//! Indicator blocks write their output columns here and condition blocks
//! read them back by name. Warm-up gaps are `None`, never zero. Columns are
//! kept in a `BTreeMap` so iteration order is deterministic regardless of
//! insertion order.

use crate::domain::error::DataError;
use crate::domain::price::PriceSeries;
use std::collections::BTreeMap;

/// One bar-aligned column; `None` marks undefined (warm-up or division by
/// a degenerate range).
pub type Column = Vec<Option<f64>>;

pub const COL_OPEN: &str = "Open";
pub const COL_HIGH: &str = "High";
pub const COL_LOW: &str = "Low";
pub const COL_CLOSE: &str = "Close";
pub const COL_VOLUME: &str = "Volume";

#[derive(Debug, Clone)]
pub struct SeriesTable {
    len: usize,
    columns: BTreeMap<String, Column>,
}

impl SeriesTable {
    /// Build a table seeded with the five base OHLCV columns.
    pub fn from_prices(series: &PriceSeries) -> Self {
        let mut columns = BTreeMap::new();
        let bars = series.bars();
        columns.insert(
            COL_OPEN.to_string(),
            bars.iter().map(|b| Some(b.open)).collect(),
        );
        columns.insert(
            COL_HIGH.to_string(),
            bars.iter().map(|b| Some(b.high)).collect(),
        );
        columns.insert(
            COL_LOW.to_string(),
            bars.iter().map(|b| Some(b.low)).collect(),
        );
        columns.insert(
            COL_CLOSE.to_string(),
            bars.iter().map(|b| Some(b.close)).collect(),
        );
        columns.insert(
            COL_VOLUME.to_string(),
            bars.iter().map(|b| Some(b.volume as f64)).collect(),
        );
        SeriesTable {
            len: bars.len(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a column, replacing any existing column of the same name.
    /// Re-adding an indicator block with identical parameters recomputes the
    /// same values, so replacement is harmless.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<(), DataError> {
        let name = name.into();
        if column.len() != self.len {
            return Err(DataError::LengthMismatch {
                series: name,
                len: column.len(),
                expected: self.len,
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in deterministic (lexicographic) order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use chrono::NaiveDate;

    fn sample_series() -> PriceSeries {
        let bars = (0..3)
            .map(|i| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, i + 1).unwrap(),
                open: 10.0 + i as f64,
                high: 11.0 + i as f64,
                low: 9.0 + i as f64,
                close: 10.5 + i as f64,
                volume: 100 * (i as i64 + 1),
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn base_columns_present() {
        let table = SeriesTable::from_prices(&sample_series());
        for name in [COL_OPEN, COL_HIGH, COL_LOW, COL_CLOSE, COL_VOLUME] {
            assert!(table.contains(name), "missing {name}");
            assert_eq!(table.get(name).unwrap().len(), 3);
        }
    }

    #[test]
    fn volume_as_float() {
        let table = SeriesTable::from_prices(&sample_series());
        assert_eq!(table.get(COL_VOLUME).unwrap()[2], Some(300.0));
    }

    #[test]
    fn insert_rejects_wrong_length() {
        let mut table = SeriesTable::from_prices(&sample_series());
        let err = table.insert("SMA_2", vec![None, Some(1.0)]).unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { len: 2, expected: 3, .. }));
    }

    #[test]
    fn insert_replaces_existing() {
        let mut table = SeriesTable::from_prices(&sample_series());
        table.insert("X", vec![Some(1.0), Some(2.0), Some(3.0)]).unwrap();
        table.insert("X", vec![None, None, None]).unwrap();
        assert_eq!(table.get("X").unwrap(), &vec![None, None, None]);
    }

    #[test]
    fn column_order_is_lexicographic() {
        let mut table = SeriesTable::from_prices(&sample_series());
        table.insert("Zed", vec![None, None, None]).unwrap();
        table.insert("Alpha", vec![None, None, None]).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(
            names,
            vec!["Alpha", "Close", "High", "Low", "Open", "Volume", "Zed"]
        );
    }
}
