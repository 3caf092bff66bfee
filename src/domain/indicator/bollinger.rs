//! Bollinger Bands: SMA middle band ± multiplier × rolling population
//! standard deviation.

use crate::domain::indicator::ma::sma;
use crate::domain::series::Column;

pub struct BollingerBands {
    pub upper: Column,
    pub middle: Column,
    pub lower: Column,
}

pub fn bollinger(values: &[f64], period: usize, mult: f64) -> BollingerBands {
    let middle = sma(values, period);
    let mut upper = vec![None; values.len()];
    let mut lower = vec![None; values.len()];

    if period > 0 {
        for i in 0..values.len() {
            let Some(mean) = middle[i] else { continue };
            let window = &values[i + 1 - period..=i];
            let variance =
                window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
            let stdev = variance.sqrt();
            upper[i] = Some(mean + mult * stdev);
            lower[i] = Some(mean - mult * stdev);
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
