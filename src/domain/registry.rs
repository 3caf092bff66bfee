//! Static block catalog.
//!
//! Maps each block type id to its kind, declared inputs/outputs, and
//! parameter schema, and owns the allowed-connection-pairs table. The
//! validator checks blocks and connections against this catalog; the signal
//! generator reads parameter defaults from it.

use crate::domain::block::BlockKind;

/// Schema for a single block parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamSchema {
    Number { min: f64, max: f64, default: f64 },
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
    Text { default: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub block_type: &'static str,
    pub name: &'static str,
    pub kind: BlockKind,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub params: &'static [(&'static str, ParamSchema)],
}

impl BlockSpec {
    pub fn param(&self, key: &str) -> Option<&'static ParamSchema> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, schema)| schema)
    }
}

pub const CATALOG: &[BlockSpec] = &[
    BlockSpec {
        block_type: "moving_average",
        name: "Moving Average",
        kind: BlockKind::Indicator,
        inputs: &["price"],
        outputs: &["ma_value"],
        params: &[
            (
                "period",
                ParamSchema::Number {
                    min: 1.0,
                    max: 200.0,
                    default: 20.0,
                },
            ),
            (
                "ma_type",
                ParamSchema::Choice {
                    options: &["simple", "exponential", "weighted"],
                    default: "simple",
                },
            ),
        ],
    },
    BlockSpec {
        block_type: "rsi",
        name: "RSI",
        kind: BlockKind::Indicator,
        inputs: &["price"],
        outputs: &["rsi_value"],
        params: &[(
            "period",
            ParamSchema::Number {
                min: 1.0,
                max: 100.0,
                default: 14.0,
            },
        )],
    },
    BlockSpec {
        block_type: "bollinger_bands",
        name: "Bollinger Bands",
        kind: BlockKind::Indicator,
        inputs: &["price"],
        outputs: &["upper_band", "middle_band", "lower_band"],
        params: &[
            (
                "period",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 20.0,
                },
            ),
            (
                "stdev",
                ParamSchema::Number {
                    min: 0.5,
                    max: 5.0,
                    default: 2.0,
                },
            ),
        ],
    },
    BlockSpec {
        block_type: "macd",
        name: "MACD",
        kind: BlockKind::Indicator,
        inputs: &["price"],
        outputs: &["macd_line", "signal_line", "histogram"],
        params: &[
            (
                "fast",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 12.0,
                },
            ),
            (
                "slow",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 26.0,
                },
            ),
            (
                "signal",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 9.0,
                },
            ),
        ],
    },
    BlockSpec {
        block_type: "atr",
        name: "ATR",
        kind: BlockKind::Indicator,
        inputs: &["high", "low", "close"],
        outputs: &["atr_value"],
        params: &[(
            "period",
            ParamSchema::Number {
                min: 1.0,
                max: 100.0,
                default: 14.0,
            },
        )],
    },
    BlockSpec {
        block_type: "stochastic",
        name: "Stochastic Oscillator",
        kind: BlockKind::Indicator,
        inputs: &["high", "low", "close"],
        outputs: &["%K", "%D"],
        params: &[
            (
                "k_period",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 14.0,
                },
            ),
            (
                "d_period",
                ParamSchema::Number {
                    min: 1.0,
                    max: 100.0,
                    default: 3.0,
                },
            ),
        ],
    },
    BlockSpec {
        block_type: "entry_condition",
        name: "Entry Condition",
        kind: BlockKind::Comparison,
        inputs: &["indicators"],
        outputs: &["signal"],
        params: &[(
            "condition",
            ParamSchema::Text {
                default: "SMA_20 > SMA_50",
            },
        )],
    },
    BlockSpec {
        block_type: "exit_condition",
        name: "Exit Condition",
        kind: BlockKind::Comparison,
        inputs: &["indicators"],
        outputs: &["signal"],
        params: &[(
            "condition",
            ParamSchema::Text {
                default: "RSI_14 > 70",
            },
        )],
    },
    BlockSpec {
        block_type: "market_order",
        name: "Market Order",
        kind: BlockKind::Order,
        inputs: &["signal"],
        outputs: &["order"],
        params: &[(
            "direction",
            ParamSchema::Choice {
                options: &["buy", "sell"],
                default: "buy",
            },
        )],
    },
    BlockSpec {
        block_type: "stop_loss",
        name: "Stop Loss",
        kind: BlockKind::Risk,
        inputs: &["entry_price"],
        outputs: &["stop_level"],
        params: &[(
            "percent",
            ParamSchema::Number {
                min: 0.1,
                max: 20.0,
                default: 2.0,
            },
        )],
    },
    BlockSpec {
        block_type: "take_profit",
        name: "Take Profit",
        kind: BlockKind::Risk,
        inputs: &["entry_price"],
        outputs: &["profit_level"],
        params: &[(
            "percent",
            ParamSchema::Number {
                min: 0.1,
                max: 50.0,
                default: 5.0,
            },
        )],
    },
];

pub fn lookup(block_type: &str) -> Option<&'static BlockSpec> {
    CATALOG.iter().find(|spec| spec.block_type == block_type)
}

/// Which (source kind -> target kind) connections carry signal flow.
pub fn pair_allowed(from: BlockKind, to: BlockKind) -> bool {
    matches!(
        (from, to),
        (BlockKind::Indicator, BlockKind::Comparison)
            | (BlockKind::Comparison, BlockKind::Order)
            | (BlockKind::Comparison, BlockKind::Risk)
            | (BlockKind::Risk, BlockKind::Order)
    )
}
