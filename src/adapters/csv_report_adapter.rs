//! CSV report adapter.
//!
//! Writes three files into the output directory: `trades.csv` (the trade
//! log), `equity.csv` (the bar-by-bar equity curve) and `summary.txt`
//! (human-readable metrics). Buy rows leave the pnl columns empty.

use crate::domain::backtest::{BacktestResult, TradeKind};
use crate::domain::error::AlgoBlocksError;
use crate::domain::strategy::Strategy;
use crate::ports::report_port::ReportPort;
use std::io::Write;
use std::path::Path;

pub struct CsvReportAdapter;

fn report_error(context: &str, e: impl std::fmt::Display) -> AlgoBlocksError {
    AlgoBlocksError::Report {
        reason: format!("{context}: {e}"),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &Strategy,
        output_dir: &Path,
    ) -> Result<(), AlgoBlocksError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| report_error("creating output directory", e))?;

        let trades_path = output_dir.join("trades.csv");
        let mut trades = csv::Writer::from_path(&trades_path)
            .map_err(|e| report_error("opening trades.csv", e))?;
        trades
            .write_record([
                "date",
                "side",
                "price",
                "shares",
                "value",
                "commission",
                "pnl",
                "pnl_pct",
            ])
            .map_err(|e| report_error("writing trades.csv", e))?;
        for trade in &result.trades {
            let side = match trade.kind {
                TradeKind::Buy => "buy",
                TradeKind::Sell => "sell",
            };
            trades
                .write_record([
                    trade.date.format("%Y-%m-%d").to_string(),
                    side.to_string(),
                    format!("{:.4}", trade.price),
                    trade.shares.to_string(),
                    format!("{:.2}", trade.value),
                    format!("{:.2}", trade.commission),
                    trade.pnl.map(|v| format!("{v:.2}")).unwrap_or_default(),
                    trade
                        .pnl_pct
                        .map(|v| format!("{v:.4}"))
                        .unwrap_or_default(),
                ])
                .map_err(|e| report_error("writing trades.csv", e))?;
        }
        trades
            .flush()
            .map_err(|e| report_error("flushing trades.csv", e))?;

        let equity_path = output_dir.join("equity.csv");
        let mut equity = csv::Writer::from_path(&equity_path)
            .map_err(|e| report_error("opening equity.csv", e))?;
        equity
            .write_record(["date", "equity"])
            .map_err(|e| report_error("writing equity.csv", e))?;
        for point in &result.equity {
            equity
                .write_record([
                    point.date.format("%Y-%m-%d").to_string(),
                    format!("{:.2}", point.equity),
                ])
                .map_err(|e| report_error("writing equity.csv", e))?;
        }
        equity
            .flush()
            .map_err(|e| report_error("flushing equity.csv", e))?;

        let summary_path = output_dir.join("summary.txt");
        let mut summary = std::fs::File::create(&summary_path)
            .map_err(|e| report_error("opening summary.txt", e))?;
        let m = &result.metrics;
        write!(
            summary,
            "Strategy: {}\n\
             Final equity: {:.2}\n\
             Total return: {:.2}%\n\
             Annualized return: {:.2}%\n\
             Sharpe ratio: {:.2}\n\
             Max drawdown: {:.2}%\n\
             Trades: {} ({} wins, {} losses)\n\
             Win rate: {:.1}%\n\
             Profit factor: {:.2}\n",
            strategy.name,
            result.final_equity,
            m.total_return,
            m.annualized_return,
            m.sharpe_ratio,
            m.max_drawdown,
            m.total_trades,
            m.winning_trades,
            m.losing_trades,
            m.win_rate,
            m.profit_factor,
        )
        .map_err(|e| report_error("writing summary.txt", e))?;

        Ok(())
    }
}
