//! Deposit network fees and the lowest-cost network choice.
//!
//! Fee tables are static configuration: exchange -> network -> fee/time.
//! The preference policy only narrows the candidate set for an amount tier;
//! the cheapest supported candidate wins.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotarb_core::{AmountTier, Currency, DepositNetwork, Exchange};
use tracing::debug;

/// Cost of depositing on one network, in the deposited currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFee {
    /// Typical confirmation time in minutes.
    #[serde(rename = "time")]
    pub time_minutes: u32,
    pub fee: Decimal,
}

impl NetworkFee {
    pub const fn new(time_minutes: u32, fee: Decimal) -> Self {
        Self { time_minutes, fee }
    }
}

/// Deposit fees per exchange and network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositFeeTable {
    exchanges: IndexMap<Exchange, IndexMap<DepositNetwork, NetworkFee>>,
}

impl DepositFeeTable {
    pub fn empty() -> Self {
        Self {
            exchanges: IndexMap::new(),
        }
    }

    /// Set the fee for a network, replacing any previous entry.
    pub fn set(&mut self, exchange: Exchange, network: DepositNetwork, fee: NetworkFee) {
        self.exchanges.entry(exchange).or_default().insert(network, fee);
    }

    pub fn fee(&self, exchange: Exchange, network: DepositNetwork) -> Option<&NetworkFee> {
        self.exchanges.get(&exchange)?.get(&network)
    }

    /// Networks accepted by `exchange`; empty for an exchange with no table.
    pub fn networks(&self, exchange: Exchange) -> impl Iterator<Item = DepositNetwork> + '_ {
        self.exchanges
            .get(&exchange)
            .into_iter()
            .flat_map(|networks| networks.keys().copied())
    }

    pub fn supports(&self, exchange: Exchange, network: DepositNetwork) -> bool {
        self.fee(exchange, network).is_some()
    }

    pub fn exchanges(&self) -> impl Iterator<Item = Exchange> + '_ {
        self.exchanges.keys().copied()
    }
}

impl Default for DepositFeeTable {
    fn default() -> Self {
        use DepositNetwork::*;

        let mut table = Self::empty();
        let rows: [(Exchange, &[(DepositNetwork, u32, Decimal)]); 3] = [
            (
                Exchange::Binance,
                &[
                    (Bsc, 1, Decimal::ZERO),
                    (Trc20, 1, Decimal::ONE),
                    (Sol, 1, Decimal::from_parts(5, 0, 0, false, 1)),
                    (Erc20, 2, Decimal::from_parts(25, 0, 0, false, 1)),
                    (Arbitrum, 1, Decimal::from_parts(18, 0, 0, false, 2)),
                    (OpBnb, 4, Decimal::ZERO),
                    (Aptos, 1, Decimal::from_parts(4, 0, 0, false, 2)),
                    (Polygon, 1, Decimal::from_parts(2, 0, 0, false, 2)),
                    (AvaxC, 1, Decimal::from_parts(81, 0, 0, false, 3)),
                    (Optimism, 1, Decimal::from_parts(25, 0, 0, false, 3)),
                    (Eos, 1, Decimal::ONE),
                    (Near, 1, Decimal::from_parts(2, 0, 0, false, 1)),
                    (Scroll, 1, Decimal::from_parts(1, 0, 0, false, 1)),
                    (Xtz, 5, Decimal::from_parts(1, 0, 0, false, 1)),
                ],
            ),
            (
                Exchange::Okx,
                &[
                    (Trc20, 2, Decimal::from_parts(25, 0, 0, false, 1)),
                    (Erc20, 2, Decimal::from_parts(144, 0, 0, false, 2)),
                    (Sol, 2, Decimal::ONE),
                    (Arbitrum, 2, Decimal::from_parts(1, 0, 0, false, 1)),
                    (XLayer, 2, Decimal::from_parts(1, 0, 0, false, 1)),
                    (Aptos, 2, Decimal::from_parts(3, 0, 0, false, 2)),
                    (AvaxC, 2, Decimal::from_parts(22, 0, 0, false, 2)),
                    (Optimism, 2, Decimal::from_parts(15, 0, 0, false, 2)),
                    (Polygon, 2, Decimal::from_parts(8, 0, 0, false, 1)),
                ],
            ),
            (
                Exchange::Htx,
                &[
                    (Trc20, 3, Decimal::from_parts(12, 0, 0, false, 1)),
                    (Erc20, 3, Decimal::from_parts(2625, 0, 0, false, 3)),
                    (Sol, 3, Decimal::from_parts(1649, 0, 0, false, 3)),
                    (Bsc, 3, Decimal::from_parts(8, 0, 0, false, 1)),
                    (AvaxC, 4, Decimal::from_parts(21, 0, 0, false, 2)),
                    (Arbitrum, 39, Decimal::ONE),
                ],
            ),
        ];

        for (exchange, networks) in rows {
            for &(network, time_minutes, fee) in networks {
                table.set(exchange, network, NetworkFee::new(time_minutes, fee));
            }
        }
        table
    }
}

/// Preferred networks per amount tier and currency, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkPreferencePolicy {
    pub small: IndexMap<Currency, Vec<DepositNetwork>>,
    pub medium: IndexMap<Currency, Vec<DepositNetwork>>,
    pub large: IndexMap<Currency, Vec<DepositNetwork>>,
}

impl NetworkPreferencePolicy {
    /// Preference list for a tier and currency; empty if the currency is unknown.
    pub fn preferences(&self, tier: AmountTier, currency: &str) -> &[DepositNetwork] {
        let table = match tier {
            AmountTier::Small => &self.small,
            AmountTier::Medium => &self.medium,
            AmountTier::Large => &self.large,
        };
        table.get(currency).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_amount(&self, amount: Decimal, currency: &str) -> &[DepositNetwork] {
        self.preferences(AmountTier::for_amount(amount), currency)
    }
}

impl Default for NetworkPreferencePolicy {
    fn default() -> Self {
        use DepositNetwork::*;

        fn tier(rows: &[(&str, &[DepositNetwork])]) -> IndexMap<Currency, Vec<DepositNetwork>> {
            rows.iter()
                .map(|(currency, networks)| (Currency::new(currency), networks.to_vec()))
                .collect()
        }

        Self {
            small: tier(&[
                ("USDT", &[Sol, Bsc, Trc20, Arbitrum, Erc20]),
                ("USDC", &[Sol, Bsc, Arbitrum, Erc20]),
                ("USD", &[Sol, Bsc, Trc20, Arbitrum, Erc20]),
            ]),
            medium: tier(&[
                ("USDT", &[Bsc, Trc20, Sol, Arbitrum]),
                ("USDC", &[Bsc, Sol, Arbitrum]),
            ]),
            large: tier(&[("USDT", &[Trc20, Bsc, Arbitrum]), ("USDC", &[Bsc, Arbitrum])]),
        }
    }
}

/// Outcome of a deposit network lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DepositRoute {
    Viable {
        network: DepositNetwork,
        fee: Decimal,
        time_minutes: u32,
    },
    /// No preferred network is accepted by the exchange. Equivalent to an
    /// unbounded cost: the opportunity must be dropped.
    Unavailable,
}

impl DepositRoute {
    /// Fee, or `None` when no transfer is possible.
    pub fn cost(&self) -> Option<Decimal> {
        match self {
            DepositRoute::Viable { fee, .. } => Some(*fee),
            DepositRoute::Unavailable => None,
        }
    }

    pub fn network(&self) -> Option<DepositNetwork> {
        match self {
            DepositRoute::Viable { network, .. } => Some(*network),
            DepositRoute::Unavailable => None,
        }
    }

    /// Confirmation time; 0 when unavailable.
    pub fn time_minutes(&self) -> u32 {
        match self {
            DepositRoute::Viable { time_minutes, .. } => *time_minutes,
            DepositRoute::Unavailable => 0,
        }
    }

    pub fn is_viable(&self) -> bool {
        matches!(self, DepositRoute::Viable { .. })
    }
}

/// Picks the cheapest deposit network for a transfer.
#[derive(Debug, Clone, Copy)]
pub struct DepositCostOptimizer<'a> {
    fees: &'a DepositFeeTable,
    policy: &'a NetworkPreferencePolicy,
}

impl<'a> DepositCostOptimizer<'a> {
    pub fn new(fees: &'a DepositFeeTable, policy: &'a NetworkPreferencePolicy) -> Self {
        Self { fees, policy }
    }

    /// Cheapest network among the tier's preferences that `exchange` accepts.
    ///
    /// Equal fees keep the earlier network in preference order.
    pub fn optimal_route(&self, exchange: Exchange, amount: Decimal, currency: &str) -> DepositRoute {
        let mut best = DepositRoute::Unavailable;

        for &network in self.policy.for_amount(amount, currency) {
            let Some(entry) = self.fees.fee(exchange, network) else {
                continue;
            };
            let cheaper = match best.cost() {
                Some(current) => entry.fee < current,
                None => true,
            };
            if cheaper {
                best = DepositRoute::Viable {
                    network,
                    fee: entry.fee,
                    time_minutes: entry.time_minutes,
                };
            }
        }

        if !best.is_viable() {
            debug!(
                "No deposit network for {} on {} (amount {})",
                currency, exchange, amount
            );
        }
        best
    }

    /// Preferred networks accepted by both exchanges, in preference order.
    pub fn common_networks(
        &self,
        first: Exchange,
        second: Exchange,
        amount: Decimal,
        currency: &str,
    ) -> Vec<DepositNetwork> {
        self.policy
            .for_amount(amount, currency)
            .iter()
            .copied()
            .filter(|&network| self.fees.supports(first, network) && self.fees.supports(second, network))
            .collect()
    }
}
