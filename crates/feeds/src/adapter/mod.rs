//! Exchange adapter trait and implementations.
//!
//! Each exchange has its own REST ticker format. Adapters normalize these
//! into `ExchangeTicker` records keyed by a `"BASE/QUOTE"` pair symbol.

mod binance;
mod bitget;
mod gate;
mod htx;
pub mod okx;
mod mexc;

pub use binance::BinanceAdapter;
pub use bitget::BitgetAdapter;
pub use gate::GateAdapter;
pub use htx::HtxAdapter;
pub use mexc::MexcAdapter;
pub use okx::OkxAdapter;

use crate::FeedError;
use compact_str::{format_compact, CompactString};
use rust_decimal::Decimal;
use serde::Serialize;
use spotarb_core::{Exchange, SkipCounter};
use thiserror::Error;
use tracing::{debug, info};

/// Leveraged-token markers, full list.
pub const LEVERAGED_MARKERS: &[&str] = &["3L", "3S", "5L", "5S", "BEAR", "BULL"];

/// Best bid/ask and traded volume for one pair on one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeTicker {
    /// `"BASE/QUOTE"`
    pub pair: CompactString,
    pub bid: Decimal,
    pub ask: Decimal,
    /// 24h volume in quote currency.
    pub volume: Decimal,
}

/// Why a single ticker was left out of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TickerSkip {
    #[error("malformed symbol")]
    MalformedSymbol,
    #[error("unsupported quote currency")]
    UnsupportedQuote,
    #[error("leveraged token")]
    LeveragedToken,
    #[error("missing or invalid field")]
    MissingField,
    #[error("price below minimum")]
    PriceTooLow,
    #[error("non-positive price")]
    NonPositivePrice,
    #[error("unknown instrument")]
    UnknownInstrument,
}

/// Parsed vs skipped counts for one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub parsed: usize,
    pub skipped: SkipCounter<TickerSkip>,
}

impl NormalizeStats {
    pub(crate) fn skip(&mut self, exchange: Exchange, symbol: &str, reason: TickerSkip) {
        debug!("{} ticker {} skipped: {}", exchange, symbol, reason);
        self.skipped.record(reason);
    }
}

/// All tickers normalized from one exchange response.
#[derive(Debug, Clone)]
pub struct TickerBatch {
    pub exchange: Exchange,
    pub tickers: Vec<ExchangeTicker>,
    pub stats: NormalizeStats,
}

impl TickerBatch {
    pub(crate) fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            tickers: Vec::new(),
            stats: NormalizeStats::default(),
        }
    }

    pub(crate) fn push(&mut self, ticker: ExchangeTicker) {
        self.stats.parsed += 1;
        self.tickers.push(ticker);
    }

    pub(crate) fn skip(&mut self, symbol: &str, reason: TickerSkip) {
        self.stats.skip(self.exchange, symbol, reason);
    }

    fn log_summary(&self) {
        info!(
            "{} tickers normalized: {}, skipped: {} ({})",
            self.exchange,
            self.stats.parsed,
            self.stats.skipped.total(),
            self.stats.skipped
        );
    }
}

/// Trait for exchange-specific ticker adapters.
pub trait TickerAdapter {
    /// Get the exchange identifier
    fn exchange() -> Exchange;

    /// Split an exchange symbol into `(base, quote)`.
    /// Returns `None` for quote currencies the adapter does not track.
    fn extract_base_quote(symbol: &str) -> Option<(String, String)>;

    /// Parse a full ticker response body.
    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError>;

    /// `"BASE/QUOTE"` pair symbol for an exchange symbol.
    fn pair_symbol(symbol: &str) -> Option<CompactString> {
        Self::extract_base_quote(symbol).map(|(base, quote)| format_compact!("{}/{}", base, quote))
    }
}

/// Normalize one exchange's ticker response.
pub fn normalize_tickers(exchange: Exchange, body: &str) -> Result<TickerBatch, FeedError> {
    let batch = match exchange {
        Exchange::Okx => OkxAdapter::parse_tickers(body)?,
        Exchange::Binance => BinanceAdapter::parse_tickers(body)?,
        Exchange::Bitget => BitgetAdapter::parse_tickers(body)?,
        Exchange::GateIO => GateAdapter::parse_tickers(body)?,
        Exchange::Mexc => MexcAdapter::parse_tickers(body)?,
        Exchange::Htx => HtxAdapter::parse_tickers(body)?,
    };
    batch.log_summary();
    Ok(batch)
}

pub(crate) fn is_leveraged(symbol: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| symbol.contains(marker))
}

/// Strip a quote suffix, rejecting an empty base.
pub(crate) fn strip_quote<'s>(symbol: &'s str, suffix: &str) -> Option<&'s str> {
    symbol.strip_suffix(suffix).filter(|base| !base.is_empty())
}
