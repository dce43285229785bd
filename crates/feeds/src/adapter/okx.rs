//! OKX spot tickers and instruments.
//!
//! Besides the cross-exchange ticker view, OKX is the single-exchange
//! source for triangular search: its ticker response carries best bid/ask
//! sizes, and the instrument list supplies base/quote currencies and tick
//! sizes.

use super::{ExchangeTicker, NormalizeStats, TickerAdapter, TickerBatch, TickerSkip};
use crate::number::{field, parse_decimal};
use crate::FeedError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use spotarb_core::{Exchange, NormalizedQuote};
use std::collections::HashMap;
use tracing::{debug, info};

/// Tick size used when an instrument does not report a usable one.
pub const DEFAULT_TICK_SIZE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

pub struct OkxAdapter;

#[derive(Debug, Deserialize)]
struct OkxResponse {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

impl OkxResponse {
    /// The `data` array of a successful response.
    fn into_data(self) -> Result<Vec<Value>, FeedError> {
        if self.code.as_str() != Some("0") {
            return Err(FeedError::Api {
                exchange: Exchange::Okx,
                message: if self.msg.is_empty() {
                    format!("code {}", self.code)
                } else {
                    self.msg
                },
            });
        }
        match self.data {
            Value::Array(items) => Ok(items),
            _ => Err(FeedError::UnexpectedShape {
                exchange: Exchange::Okx,
                detail: "data is not a list",
            }),
        }
    }
}

impl TickerAdapter for OkxAdapter {
    fn exchange() -> Exchange {
        Exchange::Okx
    }

    fn extract_base_quote(symbol: &str) -> Option<(String, String)> {
        let (base, quote) = symbol.split_once('-')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some((base.to_string(), quote.to_string()))
    }

    fn parse_tickers(body: &str) -> Result<TickerBatch, FeedError> {
        let response: OkxResponse = serde_json::from_str(body)?;
        let mut batch = TickerBatch::new(Exchange::Okx);

        for ticker in response.into_data()? {
            let inst_id = ticker.get("instId").and_then(Value::as_str).unwrap_or_default();
            let Some(pair) = Self::pair_symbol(inst_id) else {
                batch.skip(inst_id, TickerSkip::MalformedSymbol);
                continue;
            };

            let (Some(bid), Some(ask), Some(volume)) = (
                field(ticker.get("bidPx")),
                field(ticker.get("askPx")),
                field(ticker.get("vol24h")),
            ) else {
                batch.skip(inst_id, TickerSkip::MissingField);
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

#[derive(Debug, Clone)]
struct Instrument {
    base_currency: String,
    quote_currency: String,
    tick_size: Decimal,
}

/// Normalized quotes built from one OKX ticker and instrument response pair.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<NormalizedQuote>,
    pub stats: NormalizeStats,
}

impl OkxAdapter {
    /// Parse the spot instrument list into `instId -> instrument`.
    fn parse_instruments(body: &str) -> Result<HashMap<String, Instrument>, FeedError> {
        let response: OkxResponse = serde_json::from_str(body)?;
        let mut instruments = HashMap::new();

        for item in response.into_data()? {
            let text = |key: &str| item.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
            let (Some(inst_id), Some(base), Some(quote)) = (text("instId"), text("baseCcy"), text("quoteCcy"))
            else {
                debug!("OKX instrument without id or currencies skipped");
                continue;
            };

            let tick_size = field(item.get("tickSz")).unwrap_or(DEFAULT_TICK_SIZE);
            instruments.insert(
                inst_id.to_string(),
                Instrument {
                    base_currency: base.to_string(),
                    quote_currency: quote.to_string(),
                    tick_size,
                },
            );
        }

        Ok(instruments)
    }

    /// Join spot tickers with the instrument list into normalized quotes.
    ///
    /// Tickers for unknown instruments or without positive bid/ask are
    /// skipped. Missing sizes are taken as 0.
    pub fn normalize_quotes(tickers_body: &str, instruments_body: &str) -> Result<QuoteBatch, FeedError> {
        let instruments = Self::parse_instruments(instruments_body)?;
        let response: OkxResponse = serde_json::from_str(tickers_body)?;
        let mut batch = QuoteBatch::default();

        for ticker in response.into_data()? {
            let inst_id = ticker.get("instId").and_then(Value::as_str).unwrap_or_default();
            let Some(instrument) = instruments.get(inst_id) else {
                batch.stats.skip(Exchange::Okx, inst_id, TickerSkip::UnknownInstrument);
                continue;
            };

            let (Some(ask_price), Some(bid_price)) = (field(ticker.get("askPx")), field(ticker.get("bidPx")))
            else {
                batch.stats.skip(Exchange::Okx, inst_id, TickerSkip::MissingField);
                continue;
            };
            if ask_price <= Decimal::ZERO || bid_price <= Decimal::ZERO {
                batch.stats.skip(Exchange::Okx, inst_id, TickerSkip::NonPositivePrice);
                continue;
            }

            let size = |key: &str| ticker.get(key).and_then(parse_decimal).unwrap_or(Decimal::ZERO);
            batch.quotes.push(NormalizedQuote {
                instrument_id: inst_id.into(),
                base_currency: instrument.base_currency.as_str().into(),
                quote_currency: instrument.quote_currency.as_str().into(),
                ask_price,
                bid_price,
                ask_size: size("askSz"),
                bid_size: size("bidSz"),
                price_increment: instrument.tick_size,
            });
            batch.stats.parsed += 1;
        }

        info!(
            "OKX quotes normalized - valid: {}, invalid: {} ({})",
            batch.stats.parsed,
            batch.stats.skipped.total(),
            batch.stats.skipped
        );
        Ok(batch)
    }
}
