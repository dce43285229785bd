use serde_json::Value;
use spotarb_core::Exchange;

use super::{is_leveraged, strip_quote, ExchangeTicker, TickerAdapter, TickerBatch, TickerSkip};
use crate::number::field;
use crate::FeedError;

/// MEXC only lists the numbered leveraged tokens.
const MEXC_LEVERAGED_MARKERS: &[&str] = &["3L", "3S", "5L", "5S"];

pub struct MexcAdapter;

impl TickerAdapter for MexcAdapter {
    fn exchange() -> Exchange {
        Exchange::Mexc
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        strip_quote(symbol, "USDT").map(|base| (base.to_string(), "USDT".to_string()))
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let Value::Array(tickers) = serde_json::from_str::<Value>(body)? else {
            return Err(FeedError::UnexpectedShape {
                exchange: Exchange::Mexc,
                detail: "expected a ticker list",
            });
        };

        let mut batch = TickerBatch::new(Exchange::Mexc);
        for ticker in tickers {
            let symbol = ticker.get("symbol").and_then(Value::as_str).unwrap_or_default();
            let Some(pair) = Self::pair_symbol(symbol) else {
                batch.skip(symbol, TickerSkip::UnsupportedQuote);
                continue;
            };
            if is_leveraged(symbol, MEXC_LEVERAGED_MARKERS) {
                batch.skip(symbol, TickerSkip::LeveragedToken);
                continue;
            }

            let (Some(bid), Some(ask), Some(volume)) = (
                field(ticker.get("bidPrice")),
                field(ticker.get("askPrice")),
                field(ticker.get("quoteVolume")),
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
