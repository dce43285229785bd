use serde::Deserialize;
use serde_json::Value;
use spotarb_core::Exchange;

use super::{strip_quote, ExchangeTicker, TickerAdapter, TickerBatch, TickerSkip};
use crate::number::field;
use crate::FeedError;

pub struct BinanceAdapter;

/// One entry of `GET /api/v3/ticker/24hr`. Prices are usually strings but
/// may arrive as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker {
    #[serde(default)]
    symbol: String,
    bid_price: Option<Value>,
    ask_price: Option<Value>,
    quote_volume: Option<Value>,
}

/// Binance errors come back as a bare object.
#[derive(Debug, Deserialize)]
struct BinanceError {
    #[serde(default)]
    code: i64,
    msg: String,
}

impl TickerAdapter for BinanceAdapter {
    fn exchange() -> Exchange {
        Exchange::Binance
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        const QUOTES: &[&str] = &["USDT", "BTC"];
        let symbol = symbol.to_uppercase();
        QUOTES.iter().find_map(|quote| {
            strip_quote(&symbol, quote).map(|base| (base.to_string(), (*quote).to_string()))
        })
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_array() {
            return Err(match serde_json::from_value::<BinanceError>(value) {
                Ok(error) => FeedError::Api {
                    exchange: Exchange::Binance,
                    message: format!("{} (code {})", error.msg, error.code),
                },
                Err(_) => FeedError::UnexpectedShape {
                    exchange: Exchange::Binance,
                    detail: "expected a ticker list",
                },
            });
        }

        let tickers: Vec<BinanceTicker> = serde_json::from_value(value)?;
        let mut batch = TickerBatch::new(Exchange::Binance);

        for ticker in tickers {
            let Some(pair) = Self::pair_symbol(&ticker.symbol) else {
                batch.skip(&ticker.symbol, TickerSkip::UnsupportedQuote);
                continue;
            };

            let (Some(bid), Some(ask), Some(volume)) = (
                field(ticker.bid_price.as_ref()),
                field(ticker.ask_price.as_ref()),
                field(ticker.quote_volume.as_ref()),
            ) else {
                batch.skip(&ticker.symbol, TickerSkip::MissingField);
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
