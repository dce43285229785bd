//! Folding per-exchange ticker batches into one market comparison.

use crate::adapter::TickerBatch;
use spotarb_core::{MarketComparison, MarketQuote};
use tracing::info;

/// Build the pair -> exchange -> quote map from several exchange batches.
///
/// Pairs keep first-seen order across batches, so the result only depends
/// on the order of `batches`. A later ticker for the same pair and exchange
/// replaces an earlier one.
pub fn comparison_from_batches(batches: &[TickerBatch]) -> MarketComparison {
    let mut comparison = MarketComparison::new();
    for batch in batches {
        for ticker in &batch.tickers {
            comparison.insert(
                &ticker.pair,
                batch.exchange,
                MarketQuote::new(ticker.bid, ticker.ask, ticker.volume),
            );
        }
    }

    let listed_twice = comparison.iter().filter(|(_, quotes)| quotes.len() >= 2).count();
    info!(
        "Market comparison built from {} exchanges: {} pairs, {} on two or more exchanges",
        batches.len(),
        comparison.len(),
        listed_twice
    );
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::normalize_tickers;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use spotarb_core::Exchange;

    #[test]
    fn test_comparison_from_batches() {
        let okx = normalize_tickers(
            Exchange::Okx,
            r#"{"code":"0","data":[
                {"instId":"SOL-USDT","bidPx":"102.9","askPx":"103","vol24h":"5000"},
                {"instId":"ETH-USDT","bidPx":"1805","askPx":"1810","vol24h":"90000"}
            ]}"#,
        )
        .unwrap();
        let gate = normalize_tickers(
            Exchange::GateIO,
            r#"[
                {"currency_pair":"SOL_USDT","highest_bid":"99.9","lowest_ask":"100","quote_volume":"7000"},
                {"currency_pair":"PEPE_USDT","highest_bid":"0.00001","lowest_ask":"0.0000101","quote_volume":"800"}
            ]"#,
        )
        .unwrap();

        let comparison = comparison_from_batches(&[okx, gate]);

        let pairs: Vec<&str> = comparison.iter().map(|(pair, _)| pair).collect();
        assert_eq!(pairs, vec!["SOL/USDT", "ETH/USDT", "PEPE/USDT"]);

        let sol = comparison.get("SOL/USDT").unwrap();
        let exchanges: Vec<Exchange> = sol.keys().copied().collect();
        assert_eq!(exchanges, vec![Exchange::Okx, Exchange::GateIO]);
        assert_eq!(sol[&Exchange::GateIO], MarketQuote::new(dec!(99.9), dec!(100), dec!(7000)));
    }

    #[test]
    fn test_empty_batches() {
        assert!(comparison_from_batches(&[]).is_empty());
    }
}
