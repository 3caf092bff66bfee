#![allow(dead_code)]

use algoblocks::domain::block::{Block, ParamValue};
use algoblocks::domain::error::AlgoBlocksError;
use algoblocks::domain::price::{PriceBar, PriceSeries};
use algoblocks::domain::strategy::Strategy;
use algoblocks::ports::data_port::PriceDataPort;
use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: u64, close: f64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1)
            .checked_add_days(chrono::Days::new(day_offset))
            .unwrap(),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

pub fn make_prices(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as u64, close))
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// Entry/exit threshold conditions wired to one market order.
pub fn threshold_strategy(entry: &str, exit: &str) -> Strategy {
    Strategy::new("Threshold")
        .with_block(
            Block::new("entry", "entry_condition", "Entry Condition")
                .with_param("condition", ParamValue::Text(entry.into())),
        )
        .with_block(
            Block::new("exit", "exit_condition", "Exit Condition")
                .with_param("condition", ParamValue::Text(exit.into())),
        )
        .with_block(Block::new("order", "market_order", "Market Order"))
        .with_connection("entry", "order")
        .with_connection("exit", "order")
}

/// SMA crossover: fast above slow enters, fast below slow exits.
pub fn crossover_strategy(fast: u32, slow: u32) -> Strategy {
    Strategy::new("SMA Crossover")
        .with_block(
            Block::new("fast", "moving_average", "Fast MA")
                .with_param("period", ParamValue::Number(fast as f64)),
        )
        .with_block(
            Block::new("slow", "moving_average", "Slow MA")
                .with_param("period", ParamValue::Number(slow as f64)),
        )
        .with_block(Block::new("entry", "entry_condition", "Entry").with_param(
            "condition",
            ParamValue::Text(format!("SMA_{fast} > SMA_{slow}")),
        ))
        .with_block(Block::new("exit", "exit_condition", "Exit").with_param(
            "condition",
            ParamValue::Text(format!("SMA_{fast} < SMA_{slow}")),
        ))
        .with_block(Block::new("order", "market_order", "Market Order"))
        .with_connection("fast", "entry")
        .with_connection("slow", "entry")
        .with_connection("fast", "exit")
        .with_connection("slow", "exit")
        .with_connection("entry", "order")
        .with_connection("exit", "order")
}

pub struct MockPriceDataPort {
    pub series: Option<PriceSeries>,
    pub error: Option<String>,
}

impl MockPriceDataPort {
    pub fn with_series(series: PriceSeries) -> Self {
        Self {
            series: Some(series),
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            series: None,
            error: Some(reason.to_string()),
        }
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AlgoBlocksError> {
        if let Some(reason) = &self.error {
            return Err(AlgoBlocksError::DataFile {
                file: "mock".into(),
                reason: reason.clone(),
            });
        }
        let series = self.series.as_ref().expect("mock has no series");
        let bars = series
            .bars()
            .iter()
            .filter(|b| {
                start_date.is_none_or(|s| b.date >= s) && end_date.is_none_or(|e| b.date <= e)
            })
            .cloned()
            .collect();
        PriceSeries::new(bars).map_err(AlgoBlocksError::Data)
    }
}
