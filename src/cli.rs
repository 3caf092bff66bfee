//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_strategy_backtest;
use crate::domain::error::AlgoBlocksError;
use crate::domain::registry::{ParamSchema, CATALOG};
use crate::domain::strategy::Strategy;
use crate::domain::validate::validate_strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "algoblocks", about = "Block-based trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest of a strategy file over a price CSV
    Backtest {
        /// Price data CSV (Date,Open,High,Low,Close,Volume)
        #[arg(short, long)]
        data: PathBuf,
        /// Strategy JSON file
        #[arg(short, long)]
        strategy: PathBuf,
        /// Optional INI config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Report output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override initial capital
        #[arg(long)]
        capital: Option<f64>,
        /// Override proportional commission rate
        #[arg(long)]
        commission: Option<f64>,
    },
    /// Validate a strategy file without running it
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List the block catalog
    Blocks,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            strategy,
            config,
            output,
            capital,
            commission,
        } => run_backtest(
            &data,
            &strategy,
            config.as_ref(),
            output.as_ref(),
            capital,
            commission,
        ),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Blocks => run_blocks(),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AlgoBlocksError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_strategy(path: &Path) -> Result<Strategy, ExitCode> {
    let content = fs::read_to_string(path).map_err(|e| {
        let err = AlgoBlocksError::StrategyFile {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    Strategy::from_json(&content).map_err(|e| {
        let err = AlgoBlocksError::StrategyFile {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn config_date(
    adapter: Option<&FileConfigAdapter>,
    key: &str,
) -> Result<Option<NaiveDate>, ExitCode> {
    let Some(adapter) = adapter else {
        return Ok(None);
    };
    let Some(value) = adapter.get_string("backtest", key) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            let err = AlgoBlocksError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })
}

fn run_backtest(
    data_path: &Path,
    strategy_path: &Path,
    config_path: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
    capital_override: Option<f64>,
    commission_override: Option<f64>,
) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(adapter) => Some(adapter),
                Err(code) => return code,
            }
        }
        None => None,
    };

    eprintln!("Loading strategy from {}", strategy_path.display());
    let strategy = match load_strategy(strategy_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    eprintln!("Loading strategy: {}", strategy.name);

    let initial_capital = capital_override.unwrap_or_else(|| {
        config
            .as_ref()
            .map(|c| c.get_double("backtest", "initial_capital", 10_000.0))
            .unwrap_or(10_000.0)
    });
    let commission_rate = commission_override.unwrap_or_else(|| {
        config
            .as_ref()
            .map(|c| c.get_double("backtest", "commission_rate", 0.001))
            .unwrap_or(0.001)
    });
    if initial_capital <= 0.0 {
        let err = AlgoBlocksError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_capital".into(),
            reason: "must be positive".into(),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }
    if !(0.0..1.0).contains(&commission_rate) {
        let err = AlgoBlocksError::ConfigInvalid {
            section: "backtest".into(),
            key: "commission_rate".into(),
            reason: "must be in [0, 1)".into(),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    let start_date = match config_date(config.as_ref(), "start_date") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let end_date = match config_date(config.as_ref(), "end_date") {
        Ok(d) => d,
        Err(code) => return code,
    };

    eprintln!("Loading prices from {}", data_path.display());
    let data_port = CsvPriceAdapter::new(data_path.to_path_buf());
    let prices = match data_port.fetch_prices(start_date, end_date) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    eprintln!("Loaded {} bars", prices.len());

    let report = validate_strategy(&strategy);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let result = match run_strategy_backtest(&prices, &strategy, initial_capital, commission_rate)
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let m = &result.metrics;
    println!("Final equity:      {:.2}", result.final_equity);
    println!("Total return:      {:.2}%", m.total_return);
    println!("Annualized return: {:.2}%", m.annualized_return);
    println!("Sharpe ratio:      {:.2}", m.sharpe_ratio);
    println!("Max drawdown:      {:.2}%", m.max_drawdown);
    println!(
        "Trades:            {} ({} wins, {} losses)",
        m.total_trades, m.winning_trades, m.losing_trades
    );
    println!("Win rate:          {:.1}%", m.win_rate);
    println!("Profit factor:     {:.2}", m.profit_factor);

    let output_dir = output_path.cloned().or_else(|| {
        config
            .as_ref()
            .and_then(|c| c.get_string("report", "output_dir"))
            .map(PathBuf::from)
    });
    if let Some(dir) = output_dir {
        eprintln!("Writing report to {}", dir.display());
        if let Err(e) = CsvReportAdapter.write(&result, &strategy, &dir) {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(strategy_path: &Path) -> ExitCode {
    let strategy = match load_strategy(strategy_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let report = validate_strategy(&strategy);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    if report.is_valid() {
        println!(
            "{}: OK ({} blocks, {} connections)",
            strategy.name,
            strategy.blocks.len(),
            strategy.connections.len()
        );
        return ExitCode::SUCCESS;
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    match report.into_result() {
        Err(e) => ExitCode::from(&e),
        Ok(()) => ExitCode::SUCCESS,
    }
}

fn run_blocks() -> ExitCode {
    for spec in CATALOG {
        println!("{} ({}, {})", spec.name, spec.block_type, spec.kind);
        for (name, schema) in spec.params {
            match schema {
                ParamSchema::Number { min, max, default } => {
                    println!("  {name}: number in [{min}, {max}], default {default}");
                }
                ParamSchema::Choice { options, default } => {
                    println!("  {name}: one of {}, default {default}", options.join("|"));
                }
                ParamSchema::Text { default } => {
                    println!("  {name}: text, default '{default}'");
                }
            }
        }
    }
    ExitCode::SUCCESS
}
