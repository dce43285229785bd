//! Graph legs and detected arbitrage opportunities.

use crate::{Currency, DepositNetwork, Exchange};
use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TradeSide {
    Buy = 0,
    Sell = 1,
}

impl TradeSide {
    pub fn opposite(self) -> Self {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

/// One directed, tradable conversion between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: Currency,
    pub to: Currency,
    /// Conversion rate used by the profit model.
    pub rate: Decimal,
    pub side: TradeSide,
    pub instrument_id: CompactString,
    /// Quoted price the leg executes against (bid for sells, ask for buys).
    pub price: Decimal,
    /// Liquidity available in this direction.
    pub available_volume: Decimal,
    pub slippage_percent: Decimal,
    pub price_increment_units: Decimal,
}

/// A profitable 3-leg cycle `start -> c1 -> c2 -> start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangularOpportunity {
    pub path: [GraphEdge; 3],
    /// Profit rounded for display.
    pub profit_percent: Decimal,
    /// Profit at full precision.
    pub raw_profit_percent: Decimal,
    /// Amount of the start currency after the cycle, starting from 1.
    pub final_amount: Decimal,
    /// Bottleneck capacity across the three legs.
    pub path_volume: Decimal,
    pub total_slippage_percent: Decimal,
    pub max_step_slippage_percent: Decimal,
}

impl TriangularOpportunity {
    pub fn start_currency(&self) -> &str {
        &self.path[0].from
    }

    /// Currencies visited, starting and ending at the start currency.
    pub fn currencies(&self) -> [&str; 4] {
        [
            &self.path[0].from,
            &self.path[1].from,
            &self.path[2].from,
            &self.path[2].to,
        ]
    }
}

/// A buy-here, sell-there opportunity for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadOpportunity {
    pub pair: CompactString,
    pub buy_exchange: Exchange,
    pub sell_exchange: Exchange,
    /// Ask paid on the buy exchange.
    pub buy_price: Decimal,
    /// Bid received on the sell exchange.
    pub sell_price: Decimal,
    /// Tokens traded after the slippage-protection haircut.
    pub token_amount: Decimal,
    pub theoretical_profit: Decimal,
    pub trade_fee: Decimal,
    pub deposit_cost: Decimal,
    pub net_profit: Decimal,
    pub deposit_network: DepositNetwork,
    pub deposit_time_minutes: u32,
    pub spread_percent: Decimal,
    /// Quote currency spent on the buy leg.
    pub capital_used: Decimal,
}

impl SpreadOpportunity {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }
}
