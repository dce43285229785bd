//! Exchange identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spot exchange identifier.
///
/// The set is closed: ingestion dispatches on it with one normalizer per
/// variant, and the detection engine never branches on exchange identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Exchange {
    Binance = 1,
    #[serde(rename = "OKX")]
    Okx = 2,
    Bitget = 3,
    #[serde(rename = "Gate")]
    GateIO = 4,
    #[serde(rename = "MEXC")]
    Mexc = 5,
    #[serde(rename = "HTX")]
    Htx = 6,
}

impl Exchange {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Exchange::Binance),
            2 => Some(Exchange::Okx),
            3 => Some(Exchange::Bitget),
            4 => Some(Exchange::GateIO),
            5 => Some(Exchange::Mexc),
            6 => Some(Exchange::Htx),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Exchange::Binance => "Binance",
            Exchange::Okx => "OKX",
            Exchange::Bitget => "Bitget",
            Exchange::GateIO => "Gate",
            Exchange::Mexc => "MEXC",
            Exchange::Htx => "HTX",
        }
    }

    pub fn all() -> &'static [Exchange] {
        &[
            Exchange::Okx,
            Exchange::Binance,
            Exchange::Bitget,
            Exchange::GateIO,
            Exchange::Mexc,
            Exchange::Htx,
        ]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an exchange name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exchange: {0}")]
pub struct UnknownExchange(pub String);

impl FromStr for Exchange {
    type Err = UnknownExchange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "okx" => Ok(Exchange::Okx),
            "bitget" => Ok(Exchange::Bitget),
            "gate" | "gateio" | "gate.io" => Ok(Exchange::GateIO),
            "mexc" => Ok(Exchange::Mexc),
            "htx" | "huobi" => Ok(Exchange::Htx),
            _ => Err(UnknownExchange(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_from_id() {
        assert_eq!(Exchange::from_id(1), Some(Exchange::Binance));
        assert_eq!(Exchange::from_id(6), Some(Exchange::Htx));
        assert_eq!(Exchange::from_id(0), None);
        assert_eq!(Exchange::from_id(200), None);
    }

    #[test]
    fn test_exchange_id_roundtrips_for_all() {
        for exchange in Exchange::all() {
            assert_eq!(Exchange::from_id(exchange.id()), Some(*exchange));
        }
    }

    #[test]
    fn test_exchange_from_str() {
        assert_eq!("OKX".parse::<Exchange>(), Ok(Exchange::Okx));
        assert_eq!("gate.io".parse::<Exchange>(), Ok(Exchange::GateIO));
        assert_eq!("Huobi".parse::<Exchange>(), Ok(Exchange::Htx));
        assert_eq!(
            "Kraken".parse::<Exchange>(),
            Err(UnknownExchange("Kraken".to_string()))
        );
    }

    #[test]
    fn test_exchange_serde_names_match_display() {
        for exchange in Exchange::all() {
            let json = serde_json::to_string(exchange).unwrap();
            assert_eq!(json, format!("\"{}\"", exchange));
        }
    }
}
