//! Arbitrage detection engine.
//!
//! Builds a currency graph from a single exchange's quotes and searches it
//! for profitable three-leg cycles, and compares quotes across exchanges
//! for spreads that survive fees and deposit costs. Every pass is a pure
//! function of one snapshot and one `EngineConfig`.

pub mod config;
pub mod deposit;
pub mod detector;
pub mod graph;
pub mod slippage;
pub mod spread;
pub mod triangular;

pub use config::*;
pub use deposit::*;
pub use detector::*;
pub use graph::*;
pub use slippage::*;
pub use spread::*;
pub use triangular::*;
