//! Backtest simulator: replays signals bar-by-bar against the price series.
//!
//! Single-position long-only state machine (FLAT/LONG). The loop is
//! inherently sequential: each bar's action depends on the position state
//! carried from the previous bar.
//!
//! Fill policy: a signal observed on bar t fills at bar t's close —
//! same-bar execution, no slippage. Each bar records equity before any
//! fill on that bar, so the buy bar still shows the pre-entry cash value.
//! Exit takes precedence over a simultaneous entry signal while LONG;
//! entry wins while FLAT. Commission is charged independently on entry and
//! exit notional.

use crate::domain::error::{AlgoBlocksError, DataError};
use crate::domain::performance::{analyze, Metrics};
use crate::domain::price::PriceSeries;
use crate::domain::signal::{CompiledStrategy, RiskParams, SignalSeries};
use crate::domain::strategy::Strategy;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub kind: TradeKind,
    pub date: NaiveDate,
    pub price: f64,
    pub shares: i64,
    pub value: f64,
    pub commission: f64,
    /// Realized profit, sells only.
    pub pnl: Option<f64>,
    /// Realized profit as a percentage of entry, net of both commissions.
    pub pnl_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Proportional commission per fill, e.g. 0.001 for 10 bps.
    pub commission_rate: f64,
    pub risk: RiskParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            commission_rate: 0.001,
            risk: RiskParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub final_equity: f64,
    pub metrics: Metrics,
}

enum PositionState {
    Flat,
    Long {
        shares: i64,
        entry_price: f64,
        entry_commission: f64,
    },
}

/// Replay entry/exit signals over the price series.
///
/// The signal vectors must be aligned 1:1 with the bars.
pub fn run_backtest(
    prices: &PriceSeries,
    signals: &SignalSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, DataError> {
    let bars = prices.bars();
    if signals.entry.len() != bars.len() {
        return Err(DataError::LengthMismatch {
            series: "entry signal".into(),
            len: signals.entry.len(),
            expected: bars.len(),
        });
    }
    if signals.exit.len() != bars.len() {
        return Err(DataError::LengthMismatch {
            series: "exit signal".into(),
            len: signals.exit.len(),
            expected: bars.len(),
        });
    }

    let rate = config.commission_rate;
    let mut cash = config.initial_capital;
    let mut state = PositionState::Flat;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity: Vec<EquityPoint> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let close = bar.close;

        let marked = match &state {
            PositionState::Flat => cash,
            PositionState::Long { shares, .. } => cash + *shares as f64 * close,
        };
        equity.push(EquityPoint {
            date: bar.date,
            equity: marked,
        });

        match state {
            PositionState::Flat => {
                if signals.entry[i] {
                    let shares = (cash * (1.0 - rate) / close).floor() as i64;
                    if shares > 0 {
                        let value = shares as f64 * close;
                        let commission = value * rate;
                        cash -= value + commission;
                        trades.push(Trade {
                            kind: TradeKind::Buy,
                            date: bar.date,
                            price: close,
                            shares,
                            value,
                            commission,
                            pnl: None,
                            pnl_pct: None,
                        });
                        state = PositionState::Long {
                            shares,
                            entry_price: close,
                            entry_commission: commission,
                        };
                    }
                }
            }
            PositionState::Long {
                shares,
                entry_price,
                entry_commission,
            } => {
                let stop_hit = config.risk.stop_loss_pct > 0.0
                    && close <= entry_price * (1.0 - config.risk.stop_loss_pct / 100.0);
                let profit_hit = config.risk.take_profit_pct > 0.0
                    && close >= entry_price * (1.0 + config.risk.take_profit_pct / 100.0);

                if signals.exit[i] || stop_hit || profit_hit {
                    let value = shares as f64 * close;
                    let exit_commission = value * rate;
                    cash += value - exit_commission;
                    let pnl =
                        shares as f64 * (close - entry_price) - entry_commission - exit_commission;
                    let pnl_pct = (close / entry_price - 1.0) * 100.0 - rate * 2.0 * 100.0;
                    trades.push(Trade {
                        kind: TradeKind::Sell,
                        date: bar.date,
                        price: close,
                        shares,
                        value,
                        commission: exit_commission,
                        pnl: Some(pnl),
                        pnl_pct: Some(pnl_pct),
                    });
                    state = PositionState::Flat;
                }
            }
        }
    }

    let final_equity = match &state {
        PositionState::Flat => cash,
        PositionState::Long { shares, .. } => {
            cash + *shares as f64 * bars.last().map(|b| b.close).unwrap_or(0.0)
        }
    };

    let metrics = analyze(&equity, &trades, config.initial_capital);

    Ok(BacktestResult {
        trades,
        equity,
        final_equity,
        metrics,
    })
}

/// Validate, generate signals, pull risk blocks, simulate, analyze.
pub fn run_strategy_backtest(
    prices: &PriceSeries,
    strategy: &Strategy,
    initial_capital: f64,
    commission_rate: f64,
) -> Result<BacktestResult, AlgoBlocksError> {
    let compiled = CompiledStrategy::compile(strategy)?;
    let signals = compiled.signals(strategy, prices)?;
    let config = BacktestConfig {
        initial_capital,
        commission_rate,
        risk: compiled.risk,
    };
    run_backtest(prices, &signals, &config).map_err(AlgoBlocksError::Data)
}
