//! Core domain types and logic.

pub mod backtest;
pub mod block;
pub mod condition;
pub mod error;
pub mod indicator;
pub mod performance;
pub mod price;
pub mod registry;
pub mod series;
pub mod signal;
pub mod strategy;
pub mod validate;
