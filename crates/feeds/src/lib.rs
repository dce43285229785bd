//! Exchange response normalization and snapshot caching.
//!
//! This crate turns already-downloaded exchange REST bodies into the types
//! the detection engine consumes. It does no network I/O.
//!
//! ## Architecture
//!
//! - `adapter/` - Exchange-specific ticker parsing (`TickerAdapter`), plus
//!   the OKX ticker/instrument join into `NormalizedQuote`
//! - `comparison` - Folding ticker batches into a `MarketComparison`
//! - `cache` - Owned, time-stamped snapshot cache (`SnapshotCache`)

pub mod adapter;
pub mod cache;
pub mod comparison;
pub mod error;
mod number;

pub use adapter::okx::{QuoteBatch, DEFAULT_TICK_SIZE};
pub use adapter::{
    normalize_tickers, BinanceAdapter, BitgetAdapter, ExchangeTicker, GateAdapter, HtxAdapter,
    MexcAdapter, NormalizeStats, OkxAdapter, TickerAdapter, TickerBatch, TickerSkip,
    LEVERAGED_MARKERS,
};
pub use cache::*;
pub use comparison::*;
pub use error::*;
