//! Performance analysis over a completed backtest.
//!
//! Every statistic degrades to 0.0 on insufficient input (no bars, no
//! trades, zero-variance returns) instead of erroring; the one exception
//! is profit factor, which is +inf when there are winners and no losers.

use crate::domain::backtest::{EquityPoint, Trade, TradeKind};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metrics {
    /// Total return over the run, percent.
    pub total_return: f64,
    /// Return annualized over the elapsed calendar days, percent.
    pub annualized_return: f64,
    /// Annualized Sharpe ratio of daily equity returns, zero risk-free rate.
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough equity decline, percent (non-negative).
    pub max_drawdown: f64,
    /// Share of closed trades with positive pnl, percent.
    pub win_rate: f64,
    /// Gross wins over gross losses.
    pub profit_factor: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

/// Compute the full metric set from an equity curve and trade log.
pub fn analyze(equity: &[EquityPoint], trades: &[Trade], initial_capital: f64) -> Metrics {
    let mut m = Metrics::default();

    let final_equity = match equity.last() {
        Some(point) => point.equity,
        None => return m,
    };

    if initial_capital > 0.0 {
        m.total_return = (final_equity / initial_capital - 1.0) * 100.0;
    }

    if let (Some(first), Some(last)) = (equity.first(), equity.last()) {
        let elapsed_days = (last.date - first.date).num_days();
        if elapsed_days > 0 {
            let growth = 1.0 + m.total_return / 100.0;
            m.annualized_return = (growth.powf(365.0 / elapsed_days as f64) - 1.0) * 100.0;
        }
    }

    m.sharpe_ratio = sharpe(equity);
    m.max_drawdown = max_drawdown(equity);

    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.kind == TradeKind::Sell)
        .collect();
    m.total_trades = closed.len();

    let mut gross_win = 0.0;
    let mut gross_loss = 0.0;
    for trade in &closed {
        let pnl = trade.pnl.unwrap_or(0.0);
        if pnl > 0.0 {
            m.winning_trades += 1;
            gross_win += pnl;
            if pnl > m.largest_win {
                m.largest_win = pnl;
            }
        } else if pnl < 0.0 {
            m.losing_trades += 1;
            gross_loss += -pnl;
            if pnl < m.largest_loss {
                m.largest_loss = pnl;
            }
        }
    }

    if !closed.is_empty() {
        m.win_rate = m.winning_trades as f64 / closed.len() as f64 * 100.0;
    }
    if m.winning_trades > 0 {
        m.avg_win = gross_win / m.winning_trades as f64;
    }
    if m.losing_trades > 0 {
        m.avg_loss = -(gross_loss / m.losing_trades as f64);
    }
    if gross_loss > 0.0 {
        m.profit_factor = gross_win / gross_loss;
    } else if gross_win > 0.0 {
        m.profit_factor = f64::INFINITY;
    }

    m
}

fn sharpe(equity: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity
        .windows(2)
        .filter(|w| w[0].equity > 0.0)
        .map(|w| w[1].equity / w[0].equity - 1.0)
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    // Sample standard deviation.
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / (returns.len() - 1) as f64;
    let stdev = variance.sqrt();
    if stdev > 0.0 {
        mean / stdev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

fn max_drawdown(equity: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for point in equity {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let drawdown = (peak - point.equity) / peak * 100.0;
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                equity,
            })
            .collect()
    }

    fn sell(pnl: f64) -> Trade {
        Trade {
            kind: TradeKind::Sell,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            price: 100.0,
            shares: 10,
            value: 1000.0,
            commission: 0.0,
            pnl: Some(pnl),
            pnl_pct: Some(pnl / 10.0),
        }
    }

    #[test]
    fn empty_inputs_all_zero() {
        let m = analyze(&[], &[], 1000.0);
        assert_eq!(m, Metrics::default());
    }

    #[test]
    fn total_return_from_endpoints() {
        let m = analyze(&curve(&[1000.0, 1100.0, 1200.0]), &[], 1000.0);
        assert_relative_eq!(m.total_return, 20.0);
    }

    #[test]
    fn annualized_return_compounds_over_elapsed_days() {
        // 10% over 2 elapsed days.
        let m = analyze(&curve(&[1000.0, 1050.0, 1100.0]), &[], 1000.0);
        let expected = (1.10_f64.powf(365.0 / 2.0) - 1.0) * 100.0;
        assert_relative_eq!(m.annualized_return, expected);
    }

    #[test]
    fn single_point_curve_no_annualization() {
        let m = analyze(&curve(&[1200.0]), &[], 1000.0);
        assert_relative_eq!(m.total_return, 20.0);
        assert_relative_eq!(m.annualized_return, 0.0);
        assert_relative_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn flat_curve_zero_sharpe() {
        let m = analyze(&curve(&[1000.0, 1000.0, 1000.0, 1000.0]), &[], 1000.0);
        assert_relative_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn sharpe_uses_sample_stdev() {
        let m = analyze(&curve(&[1000.0, 1010.0, 1010.1]), &[], 1000.0);
        let r1: f64 = 0.01;
        let r2 = 1010.1 / 1010.0 - 1.0;
        let mean = (r1 + r2) / 2.0;
        let var = ((r1 - mean).powi(2) + (r2 - mean).powi(2)) / 1.0;
        let expected = mean / var.sqrt() * 252.0_f64.sqrt();
        assert_relative_eq!(m.sharpe_ratio, expected, max_relative = 1e-9);
    }

    #[test]
    fn drawdown_from_running_peak() {
        let m = analyze(&curve(&[1000.0, 1200.0, 900.0, 1100.0]), &[], 1000.0);
        assert_relative_eq!(m.max_drawdown, (1200.0 - 900.0) / 1200.0 * 100.0);
    }

    #[test]
    fn monotone_curve_zero_drawdown() {
        let m = analyze(&curve(&[1000.0, 1050.0, 1100.0]), &[], 1000.0);
        assert_relative_eq!(m.max_drawdown, 0.0);
    }

    #[test]
    fn trade_stats() {
        let trades = vec![sell(100.0), sell(-40.0), sell(60.0), sell(-10.0)];
        let m = analyze(&curve(&[1000.0, 1110.0]), &trades, 1000.0);
        assert_eq!(m.total_trades, 4);
        assert_eq!(m.winning_trades, 2);
        assert_eq!(m.losing_trades, 2);
        assert_relative_eq!(m.win_rate, 50.0);
        assert_relative_eq!(m.profit_factor, 160.0 / 50.0);
        assert_relative_eq!(m.avg_win, 80.0);
        assert_relative_eq!(m.avg_loss, -25.0);
        assert_relative_eq!(m.largest_win, 100.0);
        assert_relative_eq!(m.largest_loss, -40.0);
    }

    #[test]
    fn profit_factor_infinite_without_losers() {
        let m = analyze(&curve(&[1000.0, 1100.0]), &[sell(100.0)], 1000.0);
        assert!(m.profit_factor.is_infinite());
        assert_relative_eq!(m.win_rate, 100.0);
    }

    #[test]
    fn profit_factor_zero_without_winners() {
        let m = analyze(&curve(&[1000.0, 900.0]), &[sell(-100.0)], 1000.0);
        assert_relative_eq!(m.profit_factor, 0.0);
        assert_relative_eq!(m.win_rate, 0.0);
    }

    #[test]
    fn buys_excluded_from_trade_stats() {
        let buy = Trade {
            kind: TradeKind::Buy,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            price: 100.0,
            shares: 10,
            value: 1000.0,
            commission: 1.0,
            pnl: None,
            pnl_pct: None,
        };
        let m = analyze(&curve(&[1000.0, 1100.0]), &[buy, sell(50.0)], 1000.0);
        assert_eq!(m.total_trades, 1);
    }

    #[test]
    fn breakeven_trade_neither_win_nor_loss() {
        let m = analyze(&curve(&[1000.0, 1000.0]), &[sell(0.0)], 1000.0);
        assert_eq!(m.total_trades, 1);
        assert_eq!(m.winning_trades, 0);
        assert_eq!(m.losing_trades, 0);
        assert_relative_eq!(m.win_rate, 0.0);
        assert_relative_eq!(m.profit_factor, 0.0);
    }
}
