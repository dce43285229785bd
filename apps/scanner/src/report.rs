//! Human-readable rendering of detected opportunities.

use spotarb_core::{SpreadOpportunity, TradeSide, TriangularOpportunity};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Render up to `max_display` triangular opportunities, best first.
pub fn render_triangular(opportunities: &[TriangularOpportunity], max_display: usize) -> String {
    if opportunities.is_empty() {
        return "No triangular arbitrage opportunities found\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Found {} triangular opportunities:", opportunities.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for (i, opp) in opportunities.iter().take(max_display).enumerate() {
        let start = opp.start_currency();
        let _ = writeln!(out, "Opportunity #{}:", i + 1);
        let _ = writeln!(out, "  Profit: {}%", opp.profit_percent);
        let _ = writeln!(
            out,
            "  Total slippage: {:.4}% | Max step slippage: {:.4}%",
            opp.total_slippage_percent, opp.max_step_slippage_percent
        );
        let _ = writeln!(out, "  Path capacity: {:.4} {}", opp.path_volume, start);
        let _ = writeln!(out, "  Steps:");
        for (step, edge) in opp.path.iter().enumerate() {
            let action = match edge.side {
                TradeSide::Buy => "Buy ",
                TradeSide::Sell => "Sell",
            };
            let _ = writeln!(
                out,
                "    {}. {} {} -> {} ({})",
                step + 1,
                action,
                edge.from,
                edge.to,
                edge.instrument_id
            );
        }
        let _ = writeln!(
            out,
            "  1 {} -> {:.8} {}",
            start, opp.final_amount, opp.path[2].to
        );
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    if opportunities.len() > max_display {
        let _ = writeln!(out, "... {} more not shown", opportunities.len() - max_display);
    }
    out
}

/// Render up to `max_display` spread opportunities, best first.
pub fn render_spreads(opportunities: &[SpreadOpportunity], max_display: usize) -> String {
    if opportunities.is_empty() {
        return "No inter-exchange spread opportunities found\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Found {} spread opportunities:", opportunities.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for opp in opportunities.iter().take(max_display) {
        let quote = opp.pair.split_once('/').map(|(_, quote)| quote).unwrap_or_default();
        let _ = writeln!(out, "{} | spread {:.2}%", opp.pair, opp.spread_percent);
        let _ = writeln!(
            out,
            "  Buy on {} at {} | Sell on {} at {}",
            opp.buy_exchange, opp.buy_price, opp.sell_exchange, opp.sell_price
        );
        let _ = writeln!(
            out,
            "  Amount: {:.4} tokens for {:.2} {} | Deposit via {} ({} min)",
            opp.token_amount, opp.capital_used, quote, opp.deposit_network, opp.deposit_time_minutes
        );
        let _ = writeln!(
            out,
            "  Theoretical {:.2} -> net {:.2} {} (trade fee {:.2}, deposit {})",
            opp.theoretical_profit, opp.net_profit, quote, opp.trade_fee, opp.deposit_cost
        );
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    if opportunities.len() > max_display {
        let _ = writeln!(out, "... {} more not shown", opportunities.len() - max_display);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use spotarb_core::{DepositNetwork, Exchange, GraphEdge};

    fn edge(from: &str, to: &str, side: TradeSide) -> GraphEdge {
        GraphEdge {
            from: from.into(),
            to: to.into(),
            rate: dec!(1),
            side,
            instrument_id: format!("{}-{}", from, to).into(),
            price: dec!(1),
            available_volume: dec!(500),
            slippage_percent: Decimal::ZERO,
            price_increment_units: Decimal::ZERO,
        }
    }

    fn triangle() -> TriangularOpportunity {
        TriangularOpportunity {
            path: [
                edge("USDT", "BTC", TradeSide::Buy),
                edge("BTC", "ETH", TradeSide::Buy),
                edge("ETH", "USDT", TradeSide::Sell),
            ],
            profit_percent: dec!(0.6973),
            raw_profit_percent: dec!(0.697302899),
            final_amount: dec!(1.00697302899),
            path_volume: dec!(500),
            total_slippage_percent: dec!(0.25),
            max_step_slippage_percent: dec!(0.125),
        }
    }

    fn spread() -> SpreadOpportunity {
        SpreadOpportunity {
            pair: "SOL/USDT".into(),
            buy_exchange: Exchange::Binance,
            sell_exchange: Exchange::Okx,
            buy_price: dec!(100),
            sell_price: dec!(102.9),
            token_amount: dec!(0.8),
            theoretical_profit: dec!(2.32),
            trade_fee: dec!(0.33),
            deposit_cost: dec!(0.1),
            net_profit: dec!(1.89),
            deposit_network: DepositNetwork::Arbitrum,
            deposit_time_minutes: 5,
            spread_percent: dec!(2.9),
            capital_used: dec!(80.16),
        }
    }

    #[test]
    fn test_render_triangular() {
        let out = render_triangular(&[triangle()], 10);
        assert!(out.starts_with("Found 1 triangular opportunities:"));
        assert!(out.contains("Profit: 0.6973%"));
        assert!(out.contains("Path capacity: 500.0000 USDT"));
        assert!(out.contains("1. Buy  USDT -> BTC (USDT-BTC)"));
        assert!(out.contains("3. Sell ETH -> USDT (ETH-USDT)"));
        assert!(out.contains("1 USDT -> 1.00697303 USDT"));
    }

    #[test]
    fn test_render_caps_output() {
        let opps = vec![triangle(), triangle(), triangle()];
        let out = render_triangular(&opps, 2);
        assert!(out.contains("Opportunity #2:"));
        assert!(!out.contains("Opportunity #3:"));
        assert!(out.contains("... 1 more not shown"));
    }

    #[test]
    fn test_render_spreads() {
        let out = render_spreads(&[spread()], 5);
        assert!(out.contains("SOL/USDT | spread 2.90%"));
        assert!(out.contains("Buy on Binance at 100 | Sell on OKX at 102.9"));
        assert!(out.contains("Deposit via ARBITRUM (5 min)"));
        assert!(out.contains("net 1.89 USDT"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_triangular(&[], 5), "No triangular arbitrage opportunities found\n");
        assert_eq!(render_spreads(&[], 5), "No inter-exchange spread opportunities found\n");
    }
}
