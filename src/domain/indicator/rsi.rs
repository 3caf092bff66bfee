//! Relative Strength Index over simple rolling means.
//!
//! avg_gain and avg_loss are plain rolling means of the day-over-day
//! positive/negative deltas (not Wilder smoothing). The first delta needs a
//! prior bar, so the first `period` bars are undefined.
//!
//! Divide-by-zero policy: avg_loss = 0 with any gain in the window
//! saturates RSI to 100; a fully flat window (both averages 0) is
//! undefined.

use crate::domain::series::Column;

pub fn rsi(values: &[f64], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < 2 {
        return out;
    }

    let gains: Vec<f64> = values
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let losses: Vec<f64> = values
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .collect();

    // Delta j belongs to bar j+1; bar i uses deltas (i-period)..i.
    for i in period..values.len() {
        let window = (i - period)..i;
        let avg_gain: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[window].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss > 0.0 {
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        } else if avg_gain > 0.0 {
            Some(100.0)
        } else {
            None
        };
    }

    out
}
