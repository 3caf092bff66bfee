//! Moving averages: simple, exponential, weighted.
//!
//! SMA and WMA are undefined for the first (n-1) bars. EMA seeds from the
//! first value (k = 2/(n+1), no look-ahead), so it is defined from bar 0 —
//! the same convention as pandas `ewm(adjust=False)`.

use crate::domain::series::Column;

pub fn sma(values: &[f64], period: usize) -> Column {
    if period == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        window_sum += v;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

pub fn ema(values: &[f64], period: usize) -> Column {
    if period == 0 || values.is_empty() {
        return vec![None; values.len()];
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(Some(ema));
    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
        out.push(Some(ema));
    }
    out
}

pub fn wma(values: &[f64], period: usize) -> Column {
    if period == 0 {
        return vec![None; values.len()];
    }
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        let weighted: f64 = window
            .iter()
            .enumerate()
            .map(|(j, &v)| (j + 1) as f64 * v)
            .sum();
        out.push(Some(weighted / divisor));
    }
    out
}
