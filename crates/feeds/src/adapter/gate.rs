//! Gate.io spot tickers: a bare list keyed by `currency_pair` ("BTC_USDT").

use serde_json::Value;
use spotarb_core::Exchange;

use super::{is_leveraged, strip_quote, ExchangeTicker, TickerAdapter, TickerBatch, TickerSkip, LEVERAGED_MARKERS};
use crate::number::field;
use crate::FeedError;

pub struct GateAdapter;

impl TickerAdapter for GateAdapter {
    fn exchange() -> Exchange {
        Exchange::GateIO
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        strip_quote(symbol, "_USDT").map(|base| (base.to_string(), "USDT".to_string()))
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let Value::Array(tickers) = serde_json::from_str::<Value>(body)? else {
            return Err(FeedError::UnexpectedShape {
                exchange: Exchange::GateIO,
                detail: "expected a ticker list",
            });
        };

        let mut batch = TickerBatch::new(Exchange::GateIO);
        for ticker in tickers {
            let symbol = ticker.get("currency_pair").and_then(Value::as_str).unwrap_or_default();
            let Some(pair) = Self::pair_symbol(symbol) else {
                batch.skip(symbol, TickerSkip::UnsupportedQuote);
                continue;
            };
            if is_leveraged(symbol, LEVERAGED_MARKERS) {
                batch.skip(symbol, TickerSkip::LeveragedToken);
                continue;
            }

            let (Some(bid), Some(ask), Some(volume)) = (
                field(ticker.get("highest_bid")),
                field(ticker.get("lowest_ask")),
                field(ticker.get("quote_volume")),
            ) else {
                batch.skip(symbol, TickerSkip::MissingField);
                continue;
            };

            batch.push(ExchangeTicker {
                pair,
                bid,
                ask,
                volume,
            });
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_gate_parse_tickers() {
        let json = r#"[
            {"currency_pair": "BTC_USDT", "highest_bid": "60000", "lowest_ask": "60000.1", "quote_volume": "4400000"},
            {"currency_pair": "BTC3L_USDT", "highest_bid": "1.2", "lowest_ask": "1.21", "quote_volume": "1000"},
            {"currency_pair": "ETHBULL_USDT", "highest_bid": "1", "lowest_ask": "1.1", "quote_volume": "1000"},
            {"currency_pair": "ETH_BTC", "highest_bid": "0.05", "lowest_ask": "0.0501", "quote_volume": "10"},
            {"currency_pair": "DOT_USDT", "highest_bid": "", "lowest_ask": "6.1", "quote_volume": "100"}
        ]"#;
        let batch = GateAdapter::parse_tickers(json).unwrap();

        assert_eq!(
            batch.tickers,
            vec![ExchangeTicker {
                pair: "BTC/USDT".into(),
                bid: dec!(60000),
                ask: dec!(60000.1),
                volume: dec!(4400000),
            }]
        );
        assert_eq!(batch.stats.skipped.get(&TickerSkip::LeveragedToken), 2);
        assert_eq!(batch.stats.skipped.get(&TickerSkip::UnsupportedQuote), 1);
        assert_eq!(batch.stats.skipped.get(&TickerSkip::MissingField), 1);
    }

    #[test]
    fn test_gate_rejects_object() {
        let json = r#"{"label": "INVALID_PARAM_VALUE", "message": "bad"}"#;
        assert!(matches!(
            GateAdapter::parse_tickers(json),
            Err(FeedError::UnexpectedShape { exchange: Exchange::GateIO, .. })
        ));
    }
}
