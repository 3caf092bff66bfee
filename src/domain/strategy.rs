//! Strategy definition: blocks wired by connections, plus JSON import/export.
//!
//! A strategy is immutable input to the engine for the duration of one run.
//! The serialized form round-trips byte-identically: field order is fixed by
//! the struct definitions and parameter keys live in a `BTreeMap`.

use crate::domain::block::Block;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Strategy {
    pub fn new(name: impl Into<String>) -> Self {
        Strategy {
            name: name.into(),
            blocks: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_connection(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.connections.push(Connection {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Strategy> {
        serde_json::from_str(json)
    }
}
