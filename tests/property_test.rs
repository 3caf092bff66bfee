//! Property tests for indicator and simulator invariants.

mod common;

use algoblocks::domain::backtest::{run_backtest, BacktestConfig, TradeKind};
use algoblocks::domain::indicator::{ma, rsi, stochastic};
use algoblocks::domain::signal::{RiskParams, SignalSeries};
use common::*;
use proptest::prelude::*;

fn close_vec(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1000.0, 1..max_len)
}

proptest! {
    #[test]
    fn sma_equals_trailing_mean(closes in close_vec(60), period in 1usize..10) {
        let out = ma::sma(&closes, period);
        prop_assert_eq!(out.len(), closes.len());
        for (i, value) in out.iter().enumerate() {
            if i + 1 < period {
                prop_assert!(value.is_none());
            } else {
                let window = &closes[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                let got = value.unwrap();
                prop_assert!((got - mean).abs() < 1e-9 * mean.max(1.0));
            }
        }
    }

    #[test]
    fn ema_defined_everywhere_and_within_range(closes in close_vec(60), period in 1usize..10) {
        let out = ma::ema(&closes, period);
        let lo = closes.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for value in out {
            let v = value.unwrap();
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }

    #[test]
    fn rsi_bounded(closes in close_vec(80), period in 1usize..15) {
        for value in rsi::rsi(&closes, period).into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn stochastic_k_bounded(closes in close_vec(50), k_period in 1usize..10) {
        let bars: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(i as u64, c))
            .collect();
        let s = stochastic::stochastic(&bars, k_period, 3);
        for value in s.k.into_iter().flatten() {
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&value));
        }
    }

    #[test]
    fn simulator_never_oversells(
        closes in close_vec(40),
        entry_bits in prop::collection::vec(any::<bool>(), 40),
        exit_bits in prop::collection::vec(any::<bool>(), 40),
    ) {
        let n = closes.len();
        let prices = make_prices(&closes);
        let signals = SignalSeries {
            entry: entry_bits[..n].to_vec(),
            exit: exit_bits[..n].to_vec(),
        };
        let config = BacktestConfig {
            initial_capital: 10_000.0,
            commission_rate: 0.001,
            risk: RiskParams::default(),
        };
        let result = run_backtest(&prices, &signals, &config).unwrap();

        let sells = result.trades.iter().filter(|t| t.kind == TradeKind::Sell).count();
        let buys = result.trades.len() - sells;
        prop_assert!(sells <= buys);
        prop_assert!(buys <= sells + 1);
        prop_assert_eq!(result.equity.len(), n);
        // Equity never goes negative with long-only whole-share fills.
        for point in &result.equity {
            prop_assert!(point.equity >= 0.0);
        }
        prop_assert!(result.final_equity >= 0.0);
    }
}
