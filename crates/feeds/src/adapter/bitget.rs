use serde::Deserialize;
use serde_json::Value;
use spotarb_core::Exchange;

use super::{strip_quote, ExchangeTicker, TickerAdapter, TickerBatch, TickerSkip};
use crate::number::field;
use crate::FeedError;

pub struct BitgetAdapter;

#[derive(Debug, Deserialize)]
struct BitgetResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

impl TickerAdapter for BitgetAdapter {
    fn exchange() -> Exchange {
        Exchange::Bitget
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        strip_quote(symbol, "USDT").map(|base| (base.to_string(), "USDT".to_string()))
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let response: BitgetResponse = serde_json::from_str(body)?;
        if response.code != "00000" {
            return Err(FeedError::Api {
                exchange: Exchange::Bitget,
                message: response.msg,
            });
        }
        let Value::Array(tickers) = response.data else {
            return Err(FeedError::UnexpectedShape {
                exchange: Exchange::Bitget,
                detail: "data is not a list",
            });
        };

        let mut batch = TickerBatch::new(Exchange::Bitget);
        for ticker in tickers {
            let symbol = ticker.get("symbol").and_then(Value::as_str).unwrap_or_default();
            let Some(pair) = Self::pair_symbol(symbol) else {
                batch.skip(symbol, TickerSkip::UnsupportedQuote);
                continue;
            };

            // usdtVol when present and non-empty, quoteVol otherwise
            let volume = field(ticker.get("usdtVol")).or_else(|| field(ticker.get("quoteVol")));
            let (Some(bid), Some(ask), Some(volume)) =
                (field(ticker.get("buyOne")), field(ticker.get("sellOne")), volume)
            else {
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
