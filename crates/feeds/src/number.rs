//! Decimal parsing for exchange payloads.
//!
//! Exchanges send prices as JSON strings ("0.0251"), plain numbers, or
//! numbers in scientific notation (9.7e-7). Strings go straight from their
//! text to `Decimal`. JSON numbers are held by `serde_json` as `f64` and
//! parsed from its shortest round-trip rendering, so a value like `0.1`
//! comes back exactly but digits beyond `f64` precision are lost.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub(crate) fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(text) => parse_str(text),
        Value::Number(number) => parse_str(&number.to_string()),
        _ => None,
    }
}

/// Parse an optional field; `None` if missing, null or not numeric.
pub(crate) fn field(value: Option<&Value>) -> Option<Decimal> {
    value.and_then(parse_decimal)
}

pub(crate) fn parse_str(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
