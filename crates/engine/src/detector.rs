//! Arbitrage opportunity detector.
//!
//! Runs the full pipeline for one snapshot: validation, graph build and
//! triangular search, or the cross-exchange spread scan.

use crate::{
    prepare_quotes, ConfigError, DepositCostOptimizer, EngineConfig, GraphBuilder, GraphStats,
    SpreadFinder, SpreadReport, TriangularReport, TriangularSearch,
};
use spotarb_core::{MarketComparison, MarketSnapshot, QuoteRejection, SkipCounter};

/// Output of a triangular pass over one snapshot.
#[derive(Debug, Clone, Default)]
pub struct TriangularRun {
    pub invalid_quotes: SkipCounter<QuoteRejection>,
    pub graph: GraphStats,
    pub search: TriangularReport,
}

/// Opportunity detector bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct OpportunityDetector {
    config: EngineConfig,
}

impl OpportunityDetector {
    /// Create a detector, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Triangular cycles for a single exchange's snapshot.
    pub fn detect_triangular(&self, snapshot: &MarketSnapshot) -> TriangularRun {
        let prepared = prepare_quotes(snapshot);
        let build = GraphBuilder::new(&self.config.graph).build(&prepared.quotes);
        let search = TriangularSearch::new(&self.config.triangular, &self.config.slippage).run(&build.graph);

        TriangularRun {
            invalid_quotes: prepared.rejected,
            graph: build.stats,
            search,
        }
    }

    /// Cross-exchange spreads.
    pub fn detect_spreads(&self, comparison: &MarketComparison) -> SpreadReport {
        let deposits = DepositCostOptimizer::new(&self.config.deposit_fees, &self.config.network_policy);
        SpreadFinder::new(&self.config.spread, deposits).run(comparison)
    }
}
