//! Currency graph construction.
//!
//! Every validated quote can contribute two directed legs:
//!
//! - sell leg `base -> quote`: `rate = 1 / bid`, volume `bid_size`,
//!   kept only if `bid_size >= min_volume`
//! - buy leg `quote -> base`: `rate = ask`, volume `ask_size * ask`,
//!   kept only if that notional is `>= min_volume`
//!
//! Legs under the liquidity threshold are counted, not reported as errors.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotarb_core::{
    Currency, GraphEdge, MarketSnapshot, Quote, QuoteRejection, SkipCounter, TradeSide,
};
use tracing::{debug, info};

/// Graph construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Minimum liquidity per leg, in quote-currency units.
    pub min_volume: Decimal,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_volume: Decimal::ONE_HUNDRED,
        }
    }
}

/// Quotes that passed validation, plus the reasons the rest were dropped.
#[derive(Debug, Clone, Default)]
pub struct PreparedQuotes {
    pub quotes: Vec<Quote>,
    pub rejected: SkipCounter<QuoteRejection>,
}

/// Validate a snapshot's quotes and attach their metrics, keeping snapshot order.
pub fn prepare_quotes(snapshot: &MarketSnapshot) -> PreparedQuotes {
    let mut prepared = PreparedQuotes::default();

    for normalized in &snapshot.quotes {
        match Quote::new(normalized.clone()) {
            Ok(quote) => prepared.quotes.push(quote),
            Err(reason) => {
                debug!("Skipping quote {}: {}", normalized.instrument_id, reason);
                prepared.rejected.record(reason);
            }
        }
    }

    info!(
        "Prepared quotes - valid: {}, invalid: {} ({})",
        prepared.quotes.len(),
        prepared.rejected.total(),
        prepared.rejected
    );
    prepared
}

/// Directed multigraph of currencies, one edge per `(from, to)` pair.
///
/// Adjacency is insertion ordered so iteration is reproducible for a fixed
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyGraph {
    adjacency: IndexMap<Currency, IndexMap<Currency, GraphEdge>>,
}

impl CurrencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge, replacing (and returning) any edge for the same direction.
    pub fn insert(&mut self, edge: GraphEdge) -> Option<GraphEdge> {
        self.adjacency
            .entry(edge.from.clone())
            .or_default()
            .insert(edge.to.clone(), edge)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&GraphEdge> {
        self.adjacency.get(from)?.get(to)
    }

    /// Outgoing edges of `from`, in insertion order.
    pub fn edges_from<'a>(&'a self, from: &str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.adjacency
            .get(from)
            .into_iter()
            .flat_map(|neighbours| neighbours.values())
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.adjacency.values().flat_map(|neighbours| neighbours.values())
    }

    /// Currencies with at least one outgoing edge.
    pub fn source_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

/// Counters from one graph build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub quotes: usize,
    pub edges_added: usize,
    /// Legs under the liquidity threshold.
    pub edges_skipped: usize,
    /// Legs that overwrote an earlier leg for the same direction.
    pub edges_replaced: usize,
}

/// Result of one graph build.
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub graph: CurrencyGraph,
    pub stats: GraphStats,
}

/// Builds a `CurrencyGraph` from validated quotes.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    min_volume: Decimal,
}

impl GraphBuilder {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            min_volume: config.min_volume,
        }
    }

    pub fn with_min_volume(min_volume: Decimal) -> Self {
        Self { min_volume }
    }

    pub fn build(&self, quotes: &[Quote]) -> GraphBuild {
        let mut build = GraphBuild::default();
        build.stats.quotes = quotes.len();

        for quote in quotes {
            let legs = [self.sell_edge(quote), self.buy_edge(quote)];
            for leg in legs {
                match leg {
                    Some(edge) => {
                        if build.graph.insert(edge).is_some() {
                            build.stats.edges_replaced += 1;
                        }
                        build.stats.edges_added += 1;
                    }
                    None => build.stats.edges_skipped += 1,
                }
            }
        }

        info!(
            "Currency graph built - {} currencies, {} edges, skipped {} illiquid legs",
            build.graph.source_count(),
            build.graph.edge_count(),
            build.stats.edges_skipped
        );
        build
    }

    /// `base -> quote` leg, selling base at the bid.
    pub fn sell_edge(&self, quote: &Quote) -> Option<GraphEdge> {
        let q = quote.normalized();
        if q.bid_size < self.min_volume {
            return None;
        }
        let rate = Decimal::ONE.checked_div(q.bid_price)?;

        Some(GraphEdge {
            from: q.base_currency.clone(),
            to: q.quote_currency.clone(),
            rate,
            side: TradeSide::Sell,
            instrument_id: q.instrument_id.clone(),
            price: q.bid_price,
            available_volume: q.bid_size,
            slippage_percent: quote.metrics().slippage_percent,
            price_increment_units: quote.metrics().price_increment_units,
        })
    }

    /// `quote -> base` leg, buying base at the ask.
    pub fn buy_edge(&self, quote: &Quote) -> Option<GraphEdge> {
        let q = quote.normalized();
        let notional = q.ask_size.checked_mul(q.ask_price)?;
        if notional < self.min_volume {
            return None;
        }

        Some(GraphEdge {
            from: q.quote_currency.clone(),
            to: q.base_currency.clone(),
            rate: q.ask_price,
            side: TradeSide::Buy,
            instrument_id: q.instrument_id.clone(),
            price: q.ask_price,
            available_volume: notional,
            slippage_percent: quote.metrics().slippage_percent,
            price_increment_units: quote.metrics().price_increment_units,
        })
    }
}
