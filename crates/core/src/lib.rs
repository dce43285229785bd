//! Core data types for spot arbitrage detection.

pub mod exchange;
pub mod market;
pub mod network;
pub mod opportunity;
pub mod quote;
pub mod stats;

pub use exchange::*;
pub use market::*;
pub use network::*;
pub use opportunity::*;
pub use quote::*;
pub use stats::*;
