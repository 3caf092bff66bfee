//! Centralized pre-run strategy validation.
//!
//! One pass over blocks, parameters, condition expressions, and connections,
//! producing the full list of errors and warnings. Every caller (CLI,
//! library user) consumes the same report; the engine never starts signal
//! generation or a backtest on a strategy whose report has errors.

use crate::domain::block::{Block, BlockKind, ParamValue};
use crate::domain::condition::Condition;
use crate::domain::error::{AlgoBlocksError, ConnectionError, DefinitionError};
use crate::domain::registry::{self, ParamSchema};
use crate::domain::strategy::Strategy;
use std::collections::HashSet;
use std::fmt;

/// A validation-time error: either a malformed block or bad wiring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl From<StrategyError> for AlgoBlocksError {
    fn from(err: StrategyError) -> Self {
        match err {
            StrategyError::Definition(e) => AlgoBlocksError::Definition(e),
            StrategyError::Connection(e) => AlgoBlocksError::Connection(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Structurally valid, but nothing will ever trade.
    NoOrderBlocks,
    /// Condition block not wired (directly) to any order block; it
    /// contributes nothing to the generated signals.
    UnwiredCondition { block_id: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::NoOrderBlocks => {
                write!(f, "strategy has no order blocks and will produce no trades")
            }
            ValidationWarning::UnwiredCondition { block_id } => write!(
                f,
                "condition block '{block_id}' is not connected to an order block and is ignored"
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<StrategyError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AlgoBlocksError> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.into_iter().next().unwrap().into()),
            n => Err(AlgoBlocksError::InvalidStrategy {
                errors: n,
                first: self.errors[0].to_string(),
            }),
        }
    }
}

pub fn validate_strategy(strategy: &Strategy) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen_ids = HashSet::new();
    for block in &strategy.blocks {
        if !seen_ids.insert(block.id.as_str()) {
            report
                .errors
                .push(DefinitionError::DuplicateBlockId(block.id.clone()).into());
        }
        validate_block(block, &mut report);
    }

    for conn in &strategy.connections {
        validate_connection(strategy, &conn.from, &conn.to, &mut report);
    }

    let has_order = strategy
        .blocks
        .iter()
        .any(|b| block_kind(b) == Some(BlockKind::Order));
    if !has_order {
        report.warnings.push(ValidationWarning::NoOrderBlocks);
    } else {
        for block in &strategy.blocks {
            if block_kind(block) == Some(BlockKind::Comparison)
                && !wired_to_order(strategy, &block.id)
            {
                report.warnings.push(ValidationWarning::UnwiredCondition {
                    block_id: block.id.clone(),
                });
            }
        }
    }

    report
}

pub(crate) fn block_kind(block: &Block) -> Option<BlockKind> {
    registry::lookup(&block.block_type).map(|spec| spec.kind)
}

/// Whether a block feeds an order block directly; the signal generator uses
/// the same test to decide which conditions contribute.
pub(crate) fn wired_to_order(strategy: &Strategy, block_id: &str) -> bool {
    strategy.connections.iter().any(|c| {
        c.from == block_id
            && strategy
                .block(&c.to)
                .and_then(block_kind)
                .is_some_and(|k| k == BlockKind::Order)
    })
}

fn validate_block(block: &Block, report: &mut ValidationReport) {
    let Some(spec) = registry::lookup(&block.block_type) else {
        report.errors.push(
            DefinitionError::UnknownBlockType {
                block_id: block.id.clone(),
                block_type: block.block_type.clone(),
            }
            .into(),
        );
        return;
    };

    for (key, value) in &block.parameters {
        let Some(schema) = spec.param(key) else {
            report.errors.push(
                DefinitionError::UnknownParameter {
                    block_id: block.id.clone(),
                    param: key.clone(),
                }
                .into(),
            );
            continue;
        };
        if let Err(reason) = check_param(value, schema) {
            report.errors.push(
                DefinitionError::InvalidParameter {
                    block_id: block.id.clone(),
                    param: key.clone(),
                    reason,
                }
                .into(),
            );
        }
    }

    // Condition expressions parse at validation time, so malformed text is
    // a construction error here rather than a run-time surprise.
    if spec.kind == BlockKind::Comparison {
        let expression = block.text_param("condition", default_condition(spec.block_type));
        if let Err(e) = Condition::parse(expression, &block.id) {
            report.errors.push(e.into());
        }
    }
}

pub(crate) fn default_condition(block_type: &str) -> &'static str {
    match registry::lookup(block_type).and_then(|s| s.param("condition")) {
        Some(ParamSchema::Text { default }) => default,
        _ => "",
    }
}

fn check_param(value: &ParamValue, schema: &ParamSchema) -> Result<(), String> {
    match (value, schema) {
        (ParamValue::Number(v), ParamSchema::Number { min, max, .. }) => {
            if v < min || v > max {
                Err(format!("value {v} outside [{min}, {max}]"))
            } else {
                Ok(())
            }
        }
        (ParamValue::Text(s), ParamSchema::Choice { options, .. }) => {
            if options.contains(&s.as_str()) {
                Ok(())
            } else {
                Err(format!("'{s}' not one of {options:?}"))
            }
        }
        (ParamValue::Text(_), ParamSchema::Text { .. }) => Ok(()),
        (ParamValue::Text(_), ParamSchema::Number { .. }) => {
            Err("expects a number, got text".to_string())
        }
        (ParamValue::Number(_), ParamSchema::Choice { .. })
        | (ParamValue::Number(_), ParamSchema::Text { .. }) => {
            Err("expects text, got a number".to_string())
        }
    }
}

fn validate_connection(
    strategy: &Strategy,
    from: &str,
    to: &str,
    report: &mut ValidationReport,
) {
    let source = strategy.block(from);
    let target = strategy.block(to);

    if source.is_none() {
        report
            .errors
            .push(ConnectionError::DanglingSource(from.to_string()).into());
    }
    if target.is_none() {
        report
            .errors
            .push(ConnectionError::DanglingTarget(to.to_string()).into());
    }
    let (Some(source), Some(target)) = (source, target) else {
        return;
    };

    if from == to {
        report
            .errors
            .push(ConnectionError::SelfConnection(from.to_string()).into());
        return;
    }

    // Kind checks only make sense once both types resolve; unknown block
    // types were already reported above.
    let (Some(from_spec), Some(to_spec)) = (
        registry::lookup(&source.block_type),
        registry::lookup(&target.block_type),
    ) else {
        return;
    };

    if from_spec.outputs.is_empty() {
        report
            .errors
            .push(ConnectionError::SourceHasNoOutputs(from.to_string()).into());
    }
    if to_spec.inputs.is_empty() {
        report
            .errors
            .push(ConnectionError::TargetHasNoInputs(to.to_string()).into());
    }

    if !registry::pair_allowed(from_spec.kind, to_spec.kind) {
        report.errors.push(
            ConnectionError::DisallowedPair {
                from: from.to_string(),
                to: to.to_string(),
                from_kind: from_spec.kind,
                to_kind: to_spec.kind,
            }
            .into(),
        );
    }
}
