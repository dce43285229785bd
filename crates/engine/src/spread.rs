//! Inter-exchange spread finder.
//!
//! For every pair quoted on two or more exchanges: buy on the exchange with
//! the lowest ask, sell on the one with the highest bid, size the trade from
//! the capital budget and net out trading fees and the cheapest deposit to
//! the selling exchange.

use crate::{DepositCostOptimizer, DepositRoute};
use compact_str::CompactString;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spotarb_core::{
    split_pair, Exchange, MarketComparison, MarketQuote, SkipCounter, SpreadOpportunity,
};
use thiserror::Error;
use tracing::{debug, info};

/// Spread finder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Minimum spread percent and minimum net profit (quote currency).
    pub min_profit: Decimal,
    /// Minimum traded volume for a quote to be considered.
    pub min_volume: Decimal,
    /// Spreads above this percent are treated as bad data.
    pub max_spread_percent: Decimal,
    /// Quote currency available for the buy leg.
    pub available_capital: Decimal,
    /// Ask multiplier covering the buy-side fee when sizing the trade.
    pub buy_fee_multiplier: Decimal,
    /// Fraction of the sized amount actually traded.
    pub slippage_protection: Decimal,
    /// Fee rate charged on both legs' notional.
    pub trade_fee_rate: Decimal,
    /// Quotes with `bid / ask` above this are dropped.
    pub max_price_ratio: Decimal,
    /// Prices at or below this are dropped.
    pub min_valid_price: Decimal,
    /// Pairs containing any of these markers (leveraged tokens) are skipped.
    pub excluded_markers: Vec<CompactString>,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            min_profit: Decimal::new(5, 1),
            min_volume: Decimal::from(1000),
            max_spread_percent: Decimal::from(5),
            available_capital: Decimal::ONE_HUNDRED,
            buy_fee_multiplier: Decimal::new(1002, 3),
            slippage_protection: Decimal::new(8, 1),
            trade_fee_rate: Decimal::new(2, 3),
            max_price_ratio: Decimal::new(15, 1),
            min_valid_price: Decimal::new(1, 6),
            excluded_markers: ["3L", "3S", "5L", "5S", "BEAR", "BULL"]
                .into_iter()
                .map(CompactString::new)
                .collect(),
        }
    }
}

impl SpreadConfig {
    pub fn is_excluded(&self, pair: &str) -> bool {
        self.excluded_markers
            .iter()
            .any(|marker| pair.contains(marker.as_str()))
    }

    /// Whether a single exchange quote is usable.
    pub fn accepts_quote(&self, quote: &MarketQuote) -> bool {
        if quote.volume < self.min_volume
            || quote.bid_price <= self.min_valid_price
            || quote.ask_price <= self.min_valid_price
        {
            return false;
        }
        match quote.bid_price.checked_div(quote.ask_price) {
            Some(ratio) => ratio <= self.max_price_ratio,
            None => false,
        }
    }
}

/// Why a pair produced no opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SpreadRejection {
    #[error("fewer than two usable exchanges")]
    TooFewExchanges,
    #[error("excluded pair")]
    ExcludedPair,
    #[error("malformed pair symbol")]
    MalformedPair,
    #[error("best bid and ask on the same exchange")]
    SameExchange,
    #[error("spread out of range")]
    SpreadOutOfRange,
    #[error("no deposit network")]
    NoDepositNetwork,
    #[error("below min profit")]
    BelowMinProfit,
    #[error("arithmetic overflow")]
    Overflow,
}

/// Counters from one spread scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadStats {
    pub pairs: usize,
    /// Individual exchange quotes dropped by the volume/price filters.
    pub quotes_filtered: usize,
    pub accepted: usize,
    pub rejected: SkipCounter<SpreadRejection>,
}

/// Ranked spread opportunities plus scan counters.
#[derive(Debug, Clone, Default)]
pub struct SpreadReport {
    pub opportunities: Vec<SpreadOpportunity>,
    pub stats: SpreadStats,
}

/// Finds buy-low/sell-high opportunities across exchanges.
#[derive(Debug, Clone, Copy)]
pub struct SpreadFinder<'a> {
    config: &'a SpreadConfig,
    deposits: DepositCostOptimizer<'a>,
}

impl<'a> SpreadFinder<'a> {
    pub fn new(config: &'a SpreadConfig, deposits: DepositCostOptimizer<'a>) -> Self {
        Self { config, deposits }
    }

    /// Scan every pair. Output is sorted by net profit, then token amount,
    /// both descending.
    pub fn run(&self, comparison: &MarketComparison) -> SpreadReport {
        let mut report = SpreadReport::default();

        for (pair, quotes) in comparison.iter() {
            report.stats.pairs += 1;
            match self.evaluate(pair, quotes, &mut report.stats.quotes_filtered) {
                Ok(opportunity) => report.opportunities.push(opportunity),
                Err(reason) => {
                    debug!("Pair {} skipped: {}", pair, reason);
                    report.stats.rejected.record(reason);
                }
            }
        }

        report.opportunities.sort_by(|a, b| {
            b.net_profit
                .cmp(&a.net_profit)
                .then_with(|| b.token_amount.cmp(&a.token_amount))
        });
        report.stats.accepted = report.opportunities.len();

        info!(
            "Spread scan - pairs: {}, opportunities: {}, filtered quotes: {}, rejected: {}",
            report.stats.pairs, report.stats.accepted, report.stats.quotes_filtered, report.stats.rejected
        );
        report
    }

    /// Evaluate one pair's quotes.
    pub fn evaluate(
        &self,
        pair: &str,
        quotes: &IndexMap<Exchange, MarketQuote>,
        quotes_filtered: &mut usize,
    ) -> Result<SpreadOpportunity, SpreadRejection> {
        let config = self.config;

        if quotes.len() < 2 {
            return Err(SpreadRejection::TooFewExchanges);
        }
        if config.is_excluded(pair) {
            return Err(SpreadRejection::ExcludedPair);
        }
        let (_, quote_currency) = split_pair(pair).ok_or(SpreadRejection::MalformedPair)?;

        let markets: Vec<(Exchange, &MarketQuote)> = quotes
            .iter()
            .filter(|(_, quote)| config.accepts_quote(quote))
            .map(|(exchange, quote)| (*exchange, quote))
            .collect();
        *quotes_filtered += quotes.len() - markets.len();
        if markets.len() < 2 {
            return Err(SpreadRejection::TooFewExchanges);
        }

        let (buy_exchange, buy) = best_buy(&markets).ok_or(SpreadRejection::TooFewExchanges)?;
        let (sell_exchange, sell) = best_sell(&markets).ok_or(SpreadRejection::TooFewExchanges)?;
        if buy_exchange == sell_exchange {
            return Err(SpreadRejection::SameExchange);
        }

        let buy_price = buy.ask_price;
        let sell_price = sell.bid_price;

        let spread_percent = (sell_price - buy_price)
            .checked_div(buy_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(SpreadRejection::Overflow)?;
        if spread_percent > config.max_spread_percent || spread_percent < config.min_profit {
            return Err(SpreadRejection::SpreadOutOfRange);
        }

        let sizing = size_trade(config, buy_price, sell_price).ok_or(SpreadRejection::Overflow)?;

        let route = self
            .deposits
            .optimal_route(sell_exchange, sizing.sell_revenue, &quote_currency);
        let DepositRoute::Viable {
            network,
            fee: deposit_cost,
            time_minutes,
        } = route
        else {
            return Err(SpreadRejection::NoDepositNetwork);
        };

        let net_profit = sizing.theoretical_profit - sizing.trade_fee - deposit_cost;
        if net_profit < config.min_profit {
            return Err(SpreadRejection::BelowMinProfit);
        }

        Ok(SpreadOpportunity {
            pair: CompactString::new(pair),
            buy_exchange,
            sell_exchange,
            buy_price,
            sell_price,
            token_amount: sizing.token_amount,
            theoretical_profit: sizing.theoretical_profit,
            trade_fee: sizing.trade_fee,
            deposit_cost,
            net_profit,
            deposit_network: network,
            deposit_time_minutes: time_minutes,
            spread_percent,
            capital_used: sizing.buy_cost,
        })
    }
}

/// First exchange with the lowest ask.
fn best_buy<'q>(markets: &[(Exchange, &'q MarketQuote)]) -> Option<(Exchange, &'q MarketQuote)> {
    let mut best: Option<(Exchange, &MarketQuote)> = None;
    for &(exchange, quote) in markets {
        match best {
            Some((_, current)) if quote.ask_price >= current.ask_price => {}
            _ => best = Some((exchange, quote)),
        }
    }
    best
}

/// First exchange with the highest bid.
fn best_sell<'q>(markets: &[(Exchange, &'q MarketQuote)]) -> Option<(Exchange, &'q MarketQuote)> {
    let mut best: Option<(Exchange, &MarketQuote)> = None;
    for &(exchange, quote) in markets {
        match best {
            Some((_, current)) if quote.bid_price <= current.bid_price => {}
            _ => best = Some((exchange, quote)),
        }
    }
    best
}

struct TradeSizing {
    token_amount: Decimal,
    buy_cost: Decimal,
    sell_revenue: Decimal,
    theoretical_profit: Decimal,
    trade_fee: Decimal,
}

fn size_trade(config: &SpreadConfig, buy_price: Decimal, sell_price: Decimal) -> Option<TradeSizing> {
    let unit_cost = buy_price.checked_mul(config.buy_fee_multiplier)?;
    let token_amount = config
        .available_capital
        .checked_div(unit_cost)?
        .checked_mul(config.slippage_protection)?;

    let buy_cost = buy_price.checked_mul(token_amount)?;
    let sell_revenue = sell_price.checked_mul(token_amount)?;
    let trade_fee = buy_cost.checked_add(sell_revenue)?.checked_mul(config.trade_fee_rate)?;

    Some(TradeSizing {
        token_amount,
        buy_cost,
        sell_revenue,
        theoretical_profit: sell_revenue - buy_cost,
        trade_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DepositFeeTable, NetworkPreferencePolicy};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use spotarb_core::DepositNetwork;

    fn run(config: &SpreadConfig, comparison: &MarketComparison) -> SpreadReport {
        let fees = DepositFeeTable::default();
        let policy = NetworkPreferencePolicy::default();
        SpreadFinder::new(config, DepositCostOptimizer::new(&fees, &policy)).run(comparison)
    }

    fn comparison(rows: &[(&str, Exchange, Decimal, Decimal, Decimal)]) -> MarketComparison {
        let mut comparison = MarketComparison::new();
        for &(pair, exchange, bid, ask, volume) in rows {
            comparison.insert(pair, exchange, MarketQuote::new(bid, ask, volume));
        }
        comparison
    }

    #[test]
    fn test_profitable_spread() {
        let market = comparison(&[
            ("SOL/USDT", Exchange::Binance, dec!(99.9), dec!(100), dec!(5000)),
            ("SOL/USDT", Exchange::Okx, dec!(102.9), dec!(103), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        assert_eq!(report.opportunities.len(), 1);
        let opp = &report.opportunities[0];
        assert_eq!(opp.buy_exchange, Exchange::Binance);
        assert_eq!(opp.sell_exchange, Exchange::Okx);
        assert_eq!(opp.buy_price, dec!(100));
        assert_eq!(opp.sell_price, dec!(102.9));
        assert_eq!(opp.spread_percent, dec!(2.9));
        // OKX, small USDT transfer: ARBITRUM at 0.1 is the cheapest candidate
        assert_eq!(opp.deposit_network, DepositNetwork::Arbitrum);
        assert_eq!(opp.deposit_cost, dec!(0.1));
        assert_eq!(opp.deposit_time_minutes, 2);
        assert_eq!(opp.net_profit, opp.theoretical_profit - opp.trade_fee - opp.deposit_cost);
        assert_eq!(opp.capital_used, opp.buy_price * opp.token_amount);
        assert!(opp.capital_used < dec!(80) && opp.capital_used > dec!(79.8));
        assert!(opp.net_profit > dec!(1.88) && opp.net_profit < dec!(1.90), "{}", opp.net_profit);
        assert!(opp.is_profitable());
    }

    #[test]
    fn test_narrow_spread_rejected() {
        let market = comparison(&[
            ("ETH/USDT", Exchange::Binance, dec!(1795), dec!(1800), dec!(100000)),
            ("ETH/USDT", Exchange::Okx, dec!(1805), dec!(1810), dec!(100000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        assert!(report.opportunities.is_empty());
        assert_eq!(report.stats.rejected.get(&SpreadRejection::SpreadOutOfRange), 1);
    }

    #[test]
    fn test_quote_filters() {
        let config = SpreadConfig::default();
        assert!(config.accepts_quote(&MarketQuote::new(dec!(1), dec!(1.01), dec!(1000))));
        assert!(!config.accepts_quote(&MarketQuote::new(dec!(1), dec!(1.01), dec!(999))));
        assert!(!config.accepts_quote(&MarketQuote::new(dec!(0.000001), dec!(1), dec!(5000))));
        assert!(!config.accepts_quote(&MarketQuote::new(dec!(1), Decimal::ZERO, dec!(5000))));
        // bid / ask = 1.6
        assert!(!config.accepts_quote(&MarketQuote::new(dec!(1.6), dec!(1), dec!(5000))));
        assert!(config.accepts_quote(&MarketQuote::new(dec!(1.5), dec!(1), dec!(5000))));
    }

    #[test]
    fn test_filtered_quotes_leave_too_few_exchanges() {
        let market = comparison(&[
            ("SOL/USDT", Exchange::Binance, dec!(99.9), dec!(100), dec!(5000)),
            ("SOL/USDT", Exchange::Okx, dec!(102.9), dec!(103), dec!(10)),
            ("ADA/USDT", Exchange::Okx, dec!(0.5), dec!(0.51), dec!(10)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        assert!(report.opportunities.is_empty());
        assert_eq!(report.stats.pairs, 2);
        assert_eq!(report.stats.quotes_filtered, 1);
        assert_eq!(report.stats.rejected.get(&SpreadRejection::TooFewExchanges), 2);
    }

    #[test]
    fn test_excluded_and_malformed_pairs() {
        let market = comparison(&[
            ("BTC3L/USDT", Exchange::Binance, dec!(1), dec!(1.01), dec!(5000)),
            ("BTC3L/USDT", Exchange::Okx, dec!(1.05), dec!(1.06), dec!(5000)),
            ("SOLUSDT", Exchange::Binance, dec!(1), dec!(1.01), dec!(5000)),
            ("SOLUSDT", Exchange::Okx, dec!(1.05), dec!(1.06), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        assert_eq!(report.stats.rejected.get(&SpreadRejection::ExcludedPair), 1);
        assert_eq!(report.stats.rejected.get(&SpreadRejection::MalformedPair), 1);
    }

    #[test]
    fn test_same_exchange_best_both_sides() {
        let market = comparison(&[
            ("SOL/USDT", Exchange::Binance, dec!(102), dec!(100), dec!(5000)),
            ("SOL/USDT", Exchange::Okx, dec!(101), dec!(104), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);
        assert_eq!(report.stats.rejected.get(&SpreadRejection::SameExchange), 1);
    }

    #[test]
    fn test_no_deposit_network() {
        let market = comparison(&[
            ("SOL/BTC", Exchange::Binance, dec!(99.9), dec!(100), dec!(5000)),
            ("SOL/BTC", Exchange::Okx, dec!(102.9), dec!(103), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);
        assert_eq!(report.stats.rejected.get(&SpreadRejection::NoDepositNetwork), 1);
    }

    #[test]
    fn test_ties_pick_first_exchange() {
        let a = MarketQuote::new(dec!(101), dec!(100), dec!(5000));
        let b = MarketQuote::new(dec!(101), dec!(100), dec!(5000));
        let markets = [(Exchange::Mexc, &a), (Exchange::Binance, &b)];

        assert_eq!(best_buy(&markets).map(|(e, _)| e), Some(Exchange::Mexc));
        assert_eq!(best_sell(&markets).map(|(e, _)| e), Some(Exchange::Mexc));
    }

    #[test]
    fn test_sorted_by_net_profit() {
        let market = comparison(&[
            ("SOL/USDT", Exchange::Binance, dec!(99.9), dec!(100), dec!(5000)),
            ("SOL/USDT", Exchange::Okx, dec!(102.9), dec!(103), dec!(5000)),
            ("AVAX/USDT", Exchange::Binance, dec!(29.9), dec!(30), dec!(5000)),
            ("AVAX/USDT", Exchange::Okx, dec!(31.4), dec!(31.5), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        let pairs: Vec<&str> = report.opportunities.iter().map(|o| o.pair.as_str()).collect();
        assert_eq!(pairs, vec!["AVAX/USDT", "SOL/USDT"]);
        assert!(report.opportunities[0].net_profit >= report.opportunities[1].net_profit);
    }

    #[test]
    fn test_equal_net_profit_ordered_by_token_amount() {
        // same 5% spread and capital, so both pairs net the same profit
        let market = comparison(&[
            ("BBB/USDT", Exchange::Binance, dec!(19.9), dec!(20), dec!(5000)),
            ("BBB/USDT", Exchange::Okx, dec!(21), dec!(21.1), dec!(5000)),
            ("AAA/USDT", Exchange::Binance, dec!(9.9), dec!(10), dec!(5000)),
            ("AAA/USDT", Exchange::Okx, dec!(10.5), dec!(10.6), dec!(5000)),
        ]);
        let report = run(&SpreadConfig::default(), &market);

        let pairs: Vec<&str> = report.opportunities.iter().map(|o| o.pair.as_str()).collect();
        assert_eq!(pairs, vec!["AAA/USDT", "BBB/USDT"]);
        assert_eq!(report.opportunities[0].net_profit, report.opportunities[1].net_profit);
        assert!(report.opportunities[0].token_amount > report.opportunities[1].token_amount);
    }
}
