//! algoblocks — block-based trading strategy backtester.
//!
//! Strategies are directed graphs of blocks (indicators, conditions, orders,
//! risk controls) serialized as JSON. The engine validates the graph,
//! computes indicator columns over a daily price series, evaluates the
//! conditions into entry/exit signals, and replays them through a long-only
//! simulator.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
