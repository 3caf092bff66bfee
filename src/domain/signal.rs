//! Signal generation: strategy graph -> entry/exit boolean series.
//!
//! The generator does not stream data through blocks in topological order.
//! It computes every indicator block's columns onto the full series once,
//! evaluates every condition block into a boolean series, and ORs together
//! the conditions that are wired to an order block. Compilation (condition
//! parsing, risk extraction) happens once, after validation and before any
//! evaluation.

use crate::domain::block::BlockKind;
use crate::domain::condition::Condition;
use crate::domain::error::AlgoBlocksError;
use crate::domain::indicator;
use crate::domain::price::PriceSeries;
use crate::domain::series::SeriesTable;
use crate::domain::strategy::Strategy;
use crate::domain::validate::{block_kind, default_condition, validate_strategy, wired_to_order};

/// Entry/exit desire per bar, aligned to the price series index.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub entry: Vec<bool>,
    pub exit: Vec<bool>,
}

impl SignalSeries {
    pub fn all_flat(len: usize) -> Self {
        SignalSeries {
            entry: vec![false; len],
            exit: vec![false; len],
        }
    }
}

/// Risk levels pulled from the strategy's risk blocks; 0 disables a leg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskParams {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

/// A validated strategy with its conditions parsed, ready to evaluate.
#[derive(Debug, Clone)]
pub struct CompiledStrategy {
    indicator_blocks: Vec<usize>,
    entry_conditions: Vec<(String, Condition)>,
    exit_conditions: Vec<(String, Condition)>,
    pub risk: RiskParams,
}

impl CompiledStrategy {
    /// Validate and compile. Validation errors surface here; a strategy
    /// that compiles cannot fail later except for a column missing at
    /// evaluation time.
    pub fn compile(strategy: &Strategy) -> Result<CompiledStrategy, AlgoBlocksError> {
        validate_strategy(strategy).into_result()?;

        let mut compiled = CompiledStrategy {
            indicator_blocks: Vec::new(),
            entry_conditions: Vec::new(),
            exit_conditions: Vec::new(),
            risk: RiskParams::default(),
        };

        for (i, block) in strategy.blocks.iter().enumerate() {
            match block_kind(block) {
                Some(BlockKind::Indicator) => compiled.indicator_blocks.push(i),
                Some(BlockKind::Comparison) => {
                    if !wired_to_order(strategy, &block.id) {
                        continue;
                    }
                    let expression =
                        block.text_param("condition", default_condition(&block.block_type));
                    // Validation already parsed this; re-parse to own it.
                    let condition = Condition::parse(expression, &block.id)
                        .map_err(AlgoBlocksError::Definition)?;
                    match block.block_type.as_str() {
                        "exit_condition" => compiled
                            .exit_conditions
                            .push((block.id.clone(), condition)),
                        _ => compiled
                            .entry_conditions
                            .push((block.id.clone(), condition)),
                    }
                }
                Some(BlockKind::Risk) => match block.block_type.as_str() {
                    "stop_loss" if compiled.risk.stop_loss_pct == 0.0 => {
                        compiled.risk.stop_loss_pct = block.number_param("percent", 2.0);
                    }
                    "take_profit" if compiled.risk.take_profit_pct == 0.0 => {
                        compiled.risk.take_profit_pct = block.number_param("percent", 5.0);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(compiled)
    }

    /// Evaluate against a price series.
    pub fn signals(
        &self,
        strategy: &Strategy,
        prices: &PriceSeries,
    ) -> Result<SignalSeries, AlgoBlocksError> {
        let mut table = SeriesTable::from_prices(prices);
        for &i in &self.indicator_blocks {
            indicator::apply_block(&mut table, prices, &strategy.blocks[i])
                .map_err(AlgoBlocksError::Data)?;
        }

        let mut signals = SignalSeries::all_flat(prices.len());
        or_conditions(&self.entry_conditions, &table, &mut signals.entry)?;
        or_conditions(&self.exit_conditions, &table, &mut signals.exit)?;
        Ok(signals)
    }
}

fn or_conditions(
    conditions: &[(String, Condition)],
    table: &SeriesTable,
    out: &mut [bool],
) -> Result<(), AlgoBlocksError> {
    for (block_id, condition) in conditions {
        let row = condition
            .evaluate(table, block_id)
            .map_err(AlgoBlocksError::Evaluation)?;
        for (slot, hit) in out.iter_mut().zip(row) {
            *slot |= hit;
        }
    }
    Ok(())
}

/// Walk the strategy graph and produce unified entry/exit series.
///
/// An empty strategy yields all-false signals; a structurally invalid one
/// never reaches evaluation.
pub fn generate_signals(
    prices: &PriceSeries,
    strategy: &Strategy,
) -> Result<SignalSeries, AlgoBlocksError> {
    let compiled = CompiledStrategy::compile(strategy)?;
    compiled.signals(strategy, prices)
}
