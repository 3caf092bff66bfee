//! Stochastic oscillator.
//!
//! %K = 100 × (close − lowest low) / (highest high − lowest low) over
//! k_period; %D = SMA(%K, d_period). A flat range (highest == lowest) makes
//! %K undefined for that bar rather than dividing by zero, and any
//! undefined %K inside a %D window makes that %D undefined.

use crate::domain::price::PriceBar;
use crate::domain::series::Column;

pub struct Stochastic {
    pub k: Column,
    pub d: Column,
}

pub fn stochastic(bars: &[PriceBar], k_period: usize, d_period: usize) -> Stochastic {
    let mut k = vec![None; bars.len()];
    if k_period == 0 {
        return Stochastic {
            d: vec![None; bars.len()],
            k,
        };
    }

    for i in 0..bars.len() {
        if i + 1 < k_period {
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let highest = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = highest - lowest;
        if range > 0.0 {
            k[i] = Some(100.0 * (bars[i].close - lowest) / range);
        }
    }

    let d = rolling_mean(&k, d_period);
    Stochastic { k, d }
}

/// Rolling mean over a partially-defined column; the window must be fully
/// defined for the mean to be defined.
fn rolling_mean(values: &[Option<f64>], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in 0..values.len() {
        if i + 1 < period {
            continue;
        }
        let window = &values[i + 1 - period..=i];
        if window.iter().all(Option::is_some) {
            let sum: f64 = window.iter().map(|v| v.unwrap()).sum();
            out[i] = Some(sum / period as f64);
        }
    }
    out
}
