//! Normalized order-book quotes and their derived spread metrics.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency identifier (e.g. "USDT", "BTC").
pub type Currency = CompactString;

/// Best bid/ask for one spot instrument, as handed over by ingestion.
///
/// All numeric fields are exact decimals. Ingestion is expected to omit
/// quotes with non-positive prices, but `Quote::new` checks again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuote {
    /// Exchange instrument id (e.g. "BTC-USDT").
    pub instrument_id: CompactString,
    pub base_currency: Currency,
    pub quote_currency: Currency,
    /// Best ask (price to buy base).
    pub ask_price: Decimal,
    /// Best bid (price to sell base).
    pub bid_price: Decimal,
    /// Base quantity resting at the best ask.
    pub ask_size: Decimal,
    /// Base quantity resting at the best bid.
    pub bid_size: Decimal,
    /// Minimum price increment (tick size).
    pub price_increment: Decimal,
}

/// Reason a quote is dropped before reaching the currency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum QuoteRejection {
    #[error("non-positive ask price")]
    NonPositiveAsk,
    #[error("non-positive bid price")]
    NonPositiveBid,
    #[error("negative order size")]
    NegativeSize,
    #[error("negative price increment")]
    NegativeIncrement,
    #[error("base and quote currency are the same")]
    SameCurrency,
}

impl NormalizedQuote {
    /// Check the ingestion contract.
    ///
    /// A zero price increment is accepted: it only zeroes the
    /// increment-units metric.
    pub fn validate(&self) -> Result<(), QuoteRejection> {
        if self.base_currency == self.quote_currency {
            return Err(QuoteRejection::SameCurrency);
        }
        if self.ask_price <= Decimal::ZERO {
            return Err(QuoteRejection::NonPositiveAsk);
        }
        if self.bid_price <= Decimal::ZERO {
            return Err(QuoteRejection::NonPositiveBid);
        }
        if self.ask_size < Decimal::ZERO || self.bid_size < Decimal::ZERO {
            return Err(QuoteRejection::NegativeSize);
        }
        if self.price_increment < Decimal::ZERO {
            return Err(QuoteRejection::NegativeIncrement);
        }
        Ok(())
    }
}

/// Spread-derived metrics, computed once per quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteMetrics {
    /// `ask - bid`
    pub spread: Decimal,
    /// `(ask + bid) / 2`
    pub mid_price: Decimal,
    /// `spread / mid_price * 100`, or 0 when the mid price is 0.
    pub slippage_percent: Decimal,
    /// `spread / price_increment`, or 0 when the increment is 0.
    pub price_increment_units: Decimal,
}

impl QuoteMetrics {
    pub fn derive(quote: &NormalizedQuote) -> Self {
        let spread = quote.ask_price - quote.bid_price;
        let mid_price = (quote.ask_price + quote.bid_price) / Decimal::TWO;

        let slippage_percent = spread
            .checked_div(mid_price)
            .map(|ratio| ratio * Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO);

        let price_increment_units = spread
            .checked_div(quote.price_increment)
            .unwrap_or(Decimal::ZERO);

        Self {
            spread,
            mid_price,
            slippage_percent,
            price_increment_units,
        }
    }
}

/// A validated quote with its metrics attached. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    quote: NormalizedQuote,
    metrics: QuoteMetrics,
}

impl Quote {
    /// Validate a normalized quote and derive its metrics.
    pub fn new(quote: NormalizedQuote) -> Result<Self, QuoteRejection> {
        quote.validate()?;
        let metrics = QuoteMetrics::derive(&quote);
        Ok(Self { quote, metrics })
    }

    #[inline]
    pub fn normalized(&self) -> &NormalizedQuote {
        &self.quote
    }

    #[inline]
    pub fn metrics(&self) -> &QuoteMetrics {
        &self.metrics
    }

    #[inline]
    pub fn instrument_id(&self) -> &str {
        &self.quote.instrument_id
    }
}

/// Full set of quotes for one point in time.
///
/// Ingestion builds it completely before a detection pass starts; the engine
/// only ever borrows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Capture time in milliseconds since the Unix epoch.
    pub taken_at_ms: u64,
    pub quotes: Vec<NormalizedQuote>,
}

impl MarketSnapshot {
    pub fn new(taken_at_ms: u64, quotes: Vec<NormalizedQuote>) -> Self {
        Self { taken_at_ms, quotes }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
