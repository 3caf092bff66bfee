//! Technical indicator library.
//!
//! Pure functions producing bar-aligned columns, plus the dispatch that
//! turns an indicator block into named columns on a [`SeriesTable`].
//! Column names follow the convention condition expressions use:
//! `SMA_20`, `EMA_50`, `RSI_14`, `BB_Upper_20`, `MACD_Line`, `ATR_14`,
//! `%K`, `%D`.

pub mod atr;
pub mod bollinger;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod stochastic;

use crate::domain::block::Block;
use crate::domain::error::DataError;
use crate::domain::price::PriceSeries;
use crate::domain::series::SeriesTable;

/// Compute an indicator block's output columns onto the table.
///
/// Parameters fall back to the registry defaults, mirroring how the block
/// palette fills them in. Unknown block types are a validation error long
/// before this runs, so they are ignored here.
pub fn apply_block(
    table: &mut SeriesTable,
    prices: &PriceSeries,
    block: &Block,
) -> Result<(), DataError> {
    let closes = prices.closes();

    match block.block_type.as_str() {
        "moving_average" => {
            let period = block.number_param("period", 20.0) as usize;
            let ma_type = block.text_param("ma_type", "simple");
            let (name, column) = match ma_type {
                "exponential" => (format!("EMA_{period}"), ma::ema(&closes, period)),
                "weighted" => (format!("WMA_{period}"), ma::wma(&closes, period)),
                _ => (format!("SMA_{period}"), ma::sma(&closes, period)),
            };
            table.insert(name, column)?;
        }
        "rsi" => {
            let period = block.number_param("period", 14.0) as usize;
            table.insert(format!("RSI_{period}"), rsi::rsi(&closes, period))?;
        }
        "bollinger_bands" => {
            let period = block.number_param("period", 20.0) as usize;
            let mult = block.number_param("stdev", 2.0);
            let bands = bollinger::bollinger(&closes, period, mult);
            table.insert(format!("BB_Upper_{period}"), bands.upper)?;
            table.insert(format!("BB_Middle_{period}"), bands.middle)?;
            table.insert(format!("BB_Lower_{period}"), bands.lower)?;
        }
        "macd" => {
            let fast = block.number_param("fast", 12.0) as usize;
            let slow = block.number_param("slow", 26.0) as usize;
            let signal = block.number_param("signal", 9.0) as usize;
            let m = macd::macd(&closes, fast, slow, signal);
            table.insert("MACD_Line", m.line)?;
            table.insert("MACD_Signal", m.signal)?;
            table.insert("MACD_Histogram", m.histogram)?;
        }
        "atr" => {
            let period = block.number_param("period", 14.0) as usize;
            table.insert(format!("ATR_{period}"), atr::atr(prices.bars(), period))?;
        }
        "stochastic" => {
            let k_period = block.number_param("k_period", 14.0) as usize;
            let d_period = block.number_param("d_period", 3.0) as usize;
            let s = stochastic::stochastic(prices.bars(), k_period, d_period);
            table.insert("%K", s.k)?;
            table.insert("%D", s.d)?;
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::ParamValue;
    use crate::domain::price::PriceBar;
    use chrono::NaiveDate;

    fn prices(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn moving_average_column_names_by_type() {
        let series = prices(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let mut table = SeriesTable::from_prices(&series);

        for (ma_type, expected) in [
            ("simple", "SMA_3"),
            ("exponential", "EMA_3"),
            ("weighted", "WMA_3"),
        ] {
            let block = Block::new("ma", "moving_average", "MA")
                .with_param("period", ParamValue::Number(3.0))
                .with_param("ma_type", ParamValue::Text(ma_type.into()));
            apply_block(&mut table, &series, &block).unwrap();
            assert!(table.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn default_params_from_registry() {
        let series = prices(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let mut table = SeriesTable::from_prices(&series);
        apply_block(&mut table, &series, &Block::new("rsi", "rsi", "RSI")).unwrap();
        assert!(table.contains("RSI_14"));
    }

    #[test]
    fn bollinger_adds_three_columns() {
        let series = prices(&(0..25).map(|i| 100.0 + (i % 5) as f64).collect::<Vec<_>>());
        let mut table = SeriesTable::from_prices(&series);
        apply_block(
            &mut table,
            &series,
            &Block::new("bb", "bollinger_bands", "Bollinger"),
        )
        .unwrap();
        assert!(table.contains("BB_Upper_20"));
        assert!(table.contains("BB_Middle_20"));
        assert!(table.contains("BB_Lower_20"));
    }

    #[test]
    fn macd_adds_three_columns() {
        let series = prices(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let mut table = SeriesTable::from_prices(&series);
        apply_block(&mut table, &series, &Block::new("macd", "macd", "MACD")).unwrap();
        assert!(table.contains("MACD_Line"));
        assert!(table.contains("MACD_Signal"));
        assert!(table.contains("MACD_Histogram"));
    }

    #[test]
    fn stochastic_adds_k_and_d() {
        let series = prices(&(0..20).map(|i| 100.0 + (i % 7) as f64).collect::<Vec<_>>());
        let mut table = SeriesTable::from_prices(&series);
        apply_block(
            &mut table,
            &series,
            &Block::new("stoch", "stochastic", "Stochastic"),
        )
        .unwrap();
        assert!(table.contains("%K"));
        assert!(table.contains("%D"));
    }

    #[test]
    fn non_indicator_block_is_noop() {
        let series = prices(&[10.0, 11.0]);
        let mut table = SeriesTable::from_prices(&series);
        let before: Vec<String> = table.column_names().map(str::to_string).collect();
        apply_block(
            &mut table,
            &series,
            &Block::new("order", "market_order", "Order"),
        )
        .unwrap();
        let after: Vec<String> = table.column_names().map(str::to_string).collect();
        assert_eq!(before, after);
    }
}
