//! Cross-exchange market comparison.

use crate::{Currency, Exchange};
use compact_str::CompactString;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-of-book quote for one pair on one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Exchange's best bid: the price we can sell at.
    pub bid_price: Decimal,
    /// Exchange's best ask: the price we can buy at.
    pub ask_price: Decimal,
    /// Traded volume in quote currency.
    pub volume: Decimal,
}

impl MarketQuote {
    pub fn new(bid_price: Decimal, ask_price: Decimal, volume: Decimal) -> Self {
        Self {
            bid_price,
            ask_price,
            volume,
        }
    }
}

/// Pair symbol (`"BASE/QUOTE"`) to per-exchange quotes.
///
/// Insertion order is preserved so that repeated scans over the same
/// comparison visit pairs and exchanges in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketComparison {
    pairs: IndexMap<CompactString, IndexMap<Exchange, MarketQuote>>,
}

impl MarketComparison {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quote, replacing any earlier quote for the same pair and exchange.
    pub fn insert(&mut self, pair: &str, exchange: Exchange, quote: MarketQuote) {
        self.pairs
            .entry(CompactString::new(pair))
            .or_default()
            .insert(exchange, quote);
    }

    pub fn get(&self, pair: &str) -> Option<&IndexMap<Exchange, MarketQuote>> {
        self.pairs.get(pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<Exchange, MarketQuote>)> {
        self.pairs.iter().map(|(pair, quotes)| (pair.as_str(), quotes))
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Split a `"BASE/QUOTE"` pair symbol.
pub fn split_pair(pair: &str) -> Option<(Currency, Currency)> {
    let (base, quote) = pair.split_once('/')?;
    if base.is_empty() || quote.is_empty() {
        return None;
    }
    Some((Currency::new(base), Currency::new(quote)))
}
