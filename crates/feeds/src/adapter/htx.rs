use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use spotarb_core::Exchange;

use super::{strip_quote, ExchangeTicker, TickerAdapter, TickerBatch, TickerSkip};
use crate::number::field;
use crate::FeedError;

/// Quotes below this are treated as broken and dropped.
const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

pub struct HtxAdapter;

#[derive(Debug, Deserialize)]
struct HtxResponse {
    #[serde(default)]
    status: String,
    #[serde(rename = "err-msg", default)]
    err_msg: String,
    #[serde(default)]
    data: Value,
}

impl TickerAdapter for HtxAdapter {
    fn exchange() -> Exchange {
        Exchange::Htx
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        let symbol = symbol.to_uppercase();
        strip_quote(&symbol, "USDT").map(|base| (base.to_string(), "USDT".to_string()))
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let response: HtxResponse = serde_json::from_str(body)?;
        if response.status != "ok" {
            return Err(FeedError::Api {
                exchange: Exchange::Htx,
                message: response.err_msg,
            });
        }

        // data is either the list itself or an object holding "tickers"
        let tickers = match response.data {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("tickers") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => {
                return Err(FeedError::UnexpectedShape {
                    exchange: Exchange::Htx,
                    detail: "data is neither a list nor an object",
                })
            }
        };

        let mut batch = TickerBatch::new(Exchange::Htx);
        for ticker in tickers {
            let symbol = ticker.get("symbol").and_then(Value::as_str).unwrap_or_default();
            let Some(pair) = Self::pair_symbol(symbol) else {
                batch.skip(symbol, TickerSkip::UnsupportedQuote);
                continue;
            };

            let (Some(bid), Some(ask)) = (field(ticker.get("bid")), field(ticker.get("ask"))) else {
                batch.skip(symbol, TickerSkip::MissingField);
                continue;
            };
            if ask < MIN_PRICE || bid < MIN_PRICE {
                batch.skip(symbol, TickerSkip::PriceTooLow);
                continue;
            }

            batch.push(ExchangeTicker {
                pair,
                bid,
                ask,
                volume: field(ticker.get("vol")).unwrap_or(Decimal::ZERO),
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
    fn test_htx_parse_list() {
        let json = r#"{
            "status": "ok",
            "data": [
                {"symbol": "btcusdt", "bid": 60000.5, "ask": 60001.25, "vol": 123456789.5},
                {"symbol": "dogeusdt", "bid": 0.1, "ask": 0.1001},
                {"symbol": "shitusdt", "bid": 0.0000001, "ask": 0.0000002, "vol": 10},
                {"symbol": "ethbtc", "bid": 0.05, "ask": 0.0501, "vol": 10}
            ]
        }"#;
        let batch = HtxAdapter::parse_tickers(json).unwrap();

        assert_eq!(batch.tickers.len(), 2);
        assert_eq!(
            batch.tickers[0],
            ExchangeTicker {
                pair: "BTC/USDT".into(),
                bid: dec!(60000.5),
                ask: dec!(60001.25),
                volume: dec!(123456789.5),
            }
        );
        assert_eq!(batch.tickers[1].pair, "DOGE/USDT");
        assert_eq!(batch.tickers[1].volume, Decimal::ZERO);
        assert_eq!(batch.stats.skipped.get(&TickerSkip::PriceTooLow), 1);
        assert_eq!(batch.stats.skipped.get(&TickerSkip::UnsupportedQuote), 1);
    }

    #[test]
    fn test_htx_parse_nested_tickers() {
        let json = r#"{"status": "ok", "data": {"tickers": [{"symbol": "solusdt", "bid": 150, "ask": 150.1, "vol": 1}]}}"#;
        let batch = HtxAdapter::parse_tickers(json).unwrap();
        assert_eq!(batch.tickers.len(), 1);
        assert_eq!(batch.tickers[0].pair, "SOL/USDT");
    }

    #[test]
    fn test_htx_error_status() {
        let json = r#"{"status": "error", "err-code": "invalid-parameter", "err-msg": "invalid symbol"}"#;
        match HtxAdapter::parse_tickers(json) {
            Err(FeedError::Api { exchange, message }) => {
                assert_eq!(exchange, Exchange::Htx);
                assert_eq!(message, "invalid symbol");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
