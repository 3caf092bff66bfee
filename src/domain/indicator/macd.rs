//! MACD: EMA(fast) − EMA(slow), signal line, histogram.
//!
//! Both EMAs seed from the first value, so all three outputs are defined
//! from bar 0.

use crate::domain::indicator::ma::ema;
use crate::domain::series::Column;

pub struct Macd {
    pub line: Column,
    pub signal: Column,
    pub histogram: Column,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f.unwrap_or(0.0) - s.unwrap_or(0.0))
        .collect();

    let signal_line = ema(&line, signal);

    let histogram: Column = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| s.map(|s| l - s))
        .collect();

    Macd {
        line: line.into_iter().map(Some).collect(),
        signal: signal_line,
        histogram,
    }
}
