//! Strategy building blocks.
//!
//! A block is a typed unit of strategy logic identified by a registry type
//! id (e.g. `moving_average`, `entry_condition`). Its coarse kind — which
//! drives connection rules and signal wiring — comes from the registry, not
//! from the serialized form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coarse block category used by the allowed-connection-pairs table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Indicator,
    Comparison,
    Order,
    Risk,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Indicator => write!(f, "indicator"),
            BlockKind::Comparison => write!(f, "comparison"),
            BlockKind::Order => write!(f, "order"),
            BlockKind::Risk => write!(f, "risk"),
        }
    }
}

/// A block parameter value. Numeric parameters (periods, multipliers,
/// percentages) are `Number`; choice and free-text parameters (ma_type,
/// condition expressions, order direction) are `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, name: impl Into<String>) -> Self {
        Block {
            id: id.into(),
            block_type: block_type.into(),
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Numeric parameter, falling back to `default` when absent.
    /// Type mismatches are a validation concern, not a lookup concern.
    pub fn number_param(&self, key: &str, default: f64) -> f64 {
        self.parameters
            .get(key)
            .and_then(ParamValue::as_number)
            .unwrap_or(default)
    }

    pub fn text_param<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.parameters
            .get(key)
            .and_then(ParamValue::as_text)
            .unwrap_or(default)
    }
}
