//! Domain error types.
//!
//! Four engine taxonomies: [`DefinitionError`] and [`ConnectionError`] are
//! detected at strategy-validation time, before anything runs;
//! [`EvaluationError`] aborts a run in progress; [`DataError`] rejects a
//! price series before signal generation. The remaining variants cover the
//! outer surfaces (config files, strategy files, reports, io).

use crate::domain::block::BlockKind;

/// Strategy-construction errors: malformed blocks, parameters, expressions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("block {block_id}: unknown block type '{block_type}'")]
    UnknownBlockType { block_id: String, block_type: String },

    #[error("duplicate block id '{0}'")]
    DuplicateBlockId(String),

    #[error("block {block_id}: unknown parameter '{param}'")]
    UnknownParameter { block_id: String, param: String },

    #[error("block {block_id}: parameter '{param}' {reason}")]
    InvalidParameter {
        block_id: String,
        param: String,
        reason: String,
    },

    #[error("block {block_id}: malformed condition '{expression}': {reason}")]
    MalformedCondition {
        block_id: String,
        expression: String,
        reason: String,
    },

    #[error("block {block_id}: condition '{expression}' compares two literals")]
    LiteralOnlyCondition {
        block_id: String,
        expression: String,
    },
}

/// Structural errors in the block graph wiring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    #[error("connection references missing source block '{0}'")]
    DanglingSource(String),

    #[error("connection references missing target block '{0}'")]
    DanglingTarget(String),

    #[error("block '{0}' is connected to itself")]
    SelfConnection(String),

    #[error("connection {from} -> {to}: {from_kind} blocks cannot feed {to_kind} blocks")]
    DisallowedPair {
        from: String,
        to: String,
        from_kind: BlockKind,
        to_kind: BlockKind,
    },

    #[error("connection source '{0}' declares no outputs")]
    SourceHasNoOutputs(String),

    #[error("connection target '{0}' declares no inputs")]
    TargetHasNoInputs(String),
}

/// Run-time evaluation failures, tagged with the offending block.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("block {block_id}: column '{column}' not present at evaluation time")]
    UnknownColumn { block_id: String, column: String },
}

/// Price-series problems caught before any signal generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("price series dates not strictly increasing at index {index} ({date})")]
    NonMonotonicDates {
        index: usize,
        date: chrono::NaiveDate,
    },

    #[error("{series} series length {len} does not match price series length {expected}")]
    LengthMismatch {
        series: String,
        len: usize,
        expected: usize,
    },
}

/// Top-level error type for algoblocks.
#[derive(Debug, thiserror::Error)]
pub enum AlgoBlocksError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("strategy failed validation with {errors} error(s); first: {first}")]
    InvalidStrategy { errors: usize, first: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("strategy file error in {file}: {reason}")]
    StrategyFile { file: String, reason: String },

    #[error("data file error in {file}: {reason}")]
    DataFile { file: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AlgoBlocksError> for std::process::ExitCode {
    fn from(err: &AlgoBlocksError) -> Self {
        let code: u8 = match err {
            AlgoBlocksError::Io(_) | AlgoBlocksError::Report { .. } => 1,
            AlgoBlocksError::ConfigParse { .. } | AlgoBlocksError::ConfigInvalid { .. } => 2,
            AlgoBlocksError::StrategyFile { .. } => 3,
            AlgoBlocksError::Definition(_)
            | AlgoBlocksError::Connection(_)
            | AlgoBlocksError::InvalidStrategy { .. } => 4,
            AlgoBlocksError::Evaluation(_) => 5,
            AlgoBlocksError::Data(_) | AlgoBlocksError::DataFile { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
