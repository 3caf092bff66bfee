//! Average True Range: simple rolling mean of the true range.
//!
//! true range = max(high − low, |high − prev_close|, |low − prev_close|);
//! the first bar has no prior close, so its true range is high − low.

use crate::domain::price::PriceBar;
use crate::domain::series::Column;

pub fn atr(bars: &[PriceBar], period: usize) -> Column {
    let mut out = vec![None; bars.len()];
    if period == 0 {
        return out;
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let mut window_sum = 0.0;
    for i in 0..tr.len() {
        window_sum += tr[i];
        if i >= period {
            window_sum -= tr[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(window_sum / period as f64);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn warmup_undefined() {
        let bars = vec![
            bar(1, 11.0, 9.0, 10.0),
            bar(2, 12.0, 10.0, 11.0),
            bar(3, 13.0, 11.0, 12.0),
        ];
        let out = atr(&bars, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(out[2].is_some());
    }

    #[test]
    fn simple_rolling_mean_of_tr() {
        let bars = vec![
            bar(1, 11.0, 9.0, 10.0),  // tr = 2
            bar(2, 12.0, 10.0, 11.0), // tr = max(2, 2, 0) = 2
            bar(3, 15.0, 11.0, 12.0), // tr = max(4, 4, 0) = 4
        ];
        let out = atr(&bars, 3);
        assert_relative_eq!(out[2].unwrap(), (2.0 + 2.0 + 4.0) / 3.0);
    }

    #[test]
    fn gap_dominates_true_range() {
        let bars = vec![
            bar(1, 11.0, 9.0, 10.0),
            bar(2, 20.0, 19.0, 19.5), // gap up: |20-10| = 10 dominates
        ];
        let out = atr(&bars, 2);
        assert_relative_eq!(out[1].unwrap(), (2.0 + 10.0) / 2.0);
    }

    #[test]
    fn period_1_is_true_range() {
        let bars = vec![bar(1, 11.0, 9.0, 10.0), bar(2, 12.0, 10.0, 11.0)];
        let out = atr(&bars, 1);
        assert_relative_eq!(out[0].unwrap(), 2.0);
        assert_relative_eq!(out[1].unwrap(), 2.0);
    }

    #[test]
    fn zero_period_all_undefined() {
        let bars = vec![bar(1, 11.0, 9.0, 10.0)];
        assert_eq!(atr(&bars, 0), vec![None]);
    }
}
