//! Three-leg cycle search on a single exchange.
//!
//! Walks `start -> c1 -> c2 -> start` through the currency graph, carries one
//! unit of the start currency across each leg with the slippage model applied,
//! and keeps cycles that clear the profit, slippage and capacity filters.

use crate::{CurrencyGraph, SlippageModel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotarb_core::{Currency, GraphEdge, SkipCounter, TriangularOpportunity};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Triangular search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangularConfig {
    /// Currency every cycle starts and ends in.
    pub start_currency: Currency,
    /// Minimum profit in percent (0.01 = 0.01%).
    pub min_profit_percent: Decimal,
    /// Minimum bottleneck capacity across the three legs.
    pub min_volume: Decimal,
    /// Maximum sum of quoted slippage over the three legs, in percent.
    pub max_total_slippage_percent: Decimal,
    /// Decimal places kept in `profit_percent`.
    pub display_dp: u32,
}

impl Default for TriangularConfig {
    fn default() -> Self {
        Self {
            start_currency: Currency::new("USDT"),
            min_profit_percent: Decimal::new(1, 2),
            min_volume: Decimal::from(20),
            max_total_slippage_percent: Decimal::ONE,
            display_dp: 4,
        }
    }
}

/// Why a candidate cycle was not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PathRejection {
    #[error("corrupt edge")]
    CorruptEdge,
    #[error("total slippage too high")]
    SlippageTooHigh,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("below min profit")]
    BelowMinProfit,
    #[error("below min volume")]
    BelowMinVolume,
}

/// Counters from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Closed cycles found in the graph.
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: SkipCounter<PathRejection>,
}

/// Ranked opportunities plus search counters.
#[derive(Debug, Clone, Default)]
pub struct TriangularReport {
    pub opportunities: Vec<TriangularOpportunity>,
    pub stats: SearchStats,
}

/// Triangular cycle search over one `CurrencyGraph`.
#[derive(Debug, Clone, Copy)]
pub struct TriangularSearch<'a> {
    config: &'a TriangularConfig,
    model: &'a SlippageModel,
}

impl<'a> TriangularSearch<'a> {
    pub fn new(config: &'a TriangularConfig, model: &'a SlippageModel) -> Self {
        Self { config, model }
    }

    /// Enumerate, evaluate and rank every cycle through the start currency.
    ///
    /// Output is sorted by rounded profit, highest first. Equal profits keep
    /// discovery order.
    pub fn run(&self, graph: &CurrencyGraph) -> TriangularReport {
        let start = self.config.start_currency.as_str();
        let mut report = TriangularReport::default();

        for first in graph.edges_from(start) {
            let c1 = first.to.as_str();
            if c1 == start {
                continue;
            }
            for second in graph.edges_from(c1) {
                let c2 = second.to.as_str();
                if c2 == start || c2 == c1 {
                    continue;
                }
                let Some(third) = graph.edge(c2, start) else {
                    continue;
                };
                // one edge per ordered pair, so each (c1, c2) is reached once
                report.stats.candidates += 1;

                match self.evaluate([first, second, third]) {
                    Ok(opportunity) => report.opportunities.push(opportunity),
                    Err(reason) => {
                        debug!("Path {}-{}-{}-{} rejected: {}", start, c1, c2, start, reason);
                        report.stats.rejected.record(reason);
                    }
                }
            }
        }

        report
            .opportunities
            .sort_by(|a, b| b.profit_percent.cmp(&a.profit_percent));
        report.stats.accepted = report.opportunities.len();

        info!(
            "Triangular search from {} - candidates: {}, opportunities: {}, rejected: {}",
            start, report.stats.candidates, report.stats.accepted, report.stats.rejected
        );
        report
    }

    /// Score one cycle. The edges must chain `start -> c1 -> c2 -> start`.
    pub fn evaluate(&self, path: [&GraphEdge; 3]) -> Result<TriangularOpportunity, PathRejection> {
        if let Some(edge) = path
            .iter()
            .find(|edge| edge.slippage_percent < Decimal::ZERO || edge.rate <= Decimal::ZERO)
        {
            warn!(
                "Corrupt edge {} -> {} ({}): rate {}, slippage {}%",
                edge.from, edge.to, edge.instrument_id, edge.rate, edge.slippage_percent
            );
            return Err(PathRejection::CorruptEdge);
        }

        let total_slippage_percent: Decimal = path.iter().map(|edge| edge.slippage_percent).sum();
        if total_slippage_percent > self.config.max_total_slippage_percent {
            return Err(PathRejection::SlippageTooHigh);
        }

        let mut amount = Decimal::ONE;
        for edge in path {
            let multiplier = self
                .model
                .effective_multiplier(edge)
                .ok_or(PathRejection::Overflow)?;
            amount = amount.checked_mul(multiplier).ok_or(PathRejection::Overflow)?;
        }

        let raw_profit_percent = (amount - Decimal::ONE)
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PathRejection::Overflow)?;
        if raw_profit_percent < self.config.min_profit_percent {
            return Err(PathRejection::BelowMinProfit);
        }

        let path_volume = path
            .iter()
            .map(|edge| edge.available_volume)
            .min()
            .unwrap_or(Decimal::ZERO);
        if path_volume < self.config.min_volume {
            return Err(PathRejection::BelowMinVolume);
        }

        let max_step_slippage_percent = path
            .iter()
            .map(|edge| edge.slippage_percent)
            .max()
            .unwrap_or(Decimal::ZERO);

        Ok(TriangularOpportunity {
            path: path.map(GraphEdge::clone),
            profit_percent: raw_profit_percent.round_dp(self.config.display_dp),
            raw_profit_percent,
            final_amount: amount,
            path_volume,
            total_slippage_percent,
            max_step_slippage_percent,
        })
    }
}
