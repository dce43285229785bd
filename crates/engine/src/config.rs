//! Engine configuration surface.

use crate::{
    DepositFeeTable, GraphConfig, NetworkPreferencePolicy, SlippageModel, SpreadConfig,
    TriangularConfig,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: Decimal },
    #[error("{field} must be in [0, 1) (got {value})")]
    RateOutOfRange { field: &'static str, value: Decimal },
    #[error("{field} must be in [0, 1] (got {value})")]
    FractionOutOfRange { field: &'static str, value: Decimal },
    #[error("start currency must not be empty")]
    EmptyStartCurrency,
}

/// Everything one analysis run needs. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub graph: GraphConfig,
    pub slippage: SlippageModel,
    pub triangular: TriangularConfig,
    pub spread: SpreadConfig,
    pub deposit_fees: DepositFeeTable,
    pub network_policy: NetworkPreferencePolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("graph.min_volume", self.graph.min_volume)?;

        rate("slippage.fee_rate", self.slippage.fee_rate)?;
        positive("slippage.sensitivity", self.slippage.sensitivity)?;
        fraction("slippage.max_impact", self.slippage.max_impact)?;
        non_negative("slippage.exponent_limit", self.slippage.exponent_limit)?;

        if self.triangular.start_currency.trim().is_empty() {
            return Err(ConfigError::EmptyStartCurrency);
        }
        non_negative("triangular.min_volume", self.triangular.min_volume)?;
        non_negative(
            "triangular.max_total_slippage_percent",
            self.triangular.max_total_slippage_percent,
        )?;

        let spread = &self.spread;
        non_negative("spread.min_volume", spread.min_volume)?;
        non_negative("spread.max_spread_percent", spread.max_spread_percent)?;
        positive("spread.available_capital", spread.available_capital)?;
        positive("spread.buy_fee_multiplier", spread.buy_fee_multiplier)?;
        fraction("spread.slippage_protection", spread.slippage_protection)?;
        rate("spread.trade_fee_rate", spread.trade_fee_rate)?;
        positive("spread.max_price_ratio", spread.max_price_ratio)?;
        non_negative("spread.min_valid_price", spread.min_valid_price)?;

        Ok(())
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn rate(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(ConfigError::RateOutOfRange { field, value });
    }
    Ok(())
}

fn fraction(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::FractionOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = EngineConfig::default();
        config.slippage.fee_rate = dec!(1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                field: "slippage.fee_rate",
                value: dec!(1),
            })
        );

        let mut config = EngineConfig::default();
        config.spread.available_capital = Decimal::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "spread.available_capital", .. })
        ));

        let mut config = EngineConfig::default();
        config.triangular.start_currency = " ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyStartCurrency));

        let mut config = EngineConfig::default();
        config.graph.min_volume = dec!(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "triangular": {"start_currency": "BTC", "min_profit_percent": "0.05"},
            "spread": {"available_capital": 500}
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.triangular.start_currency, "BTC");
        assert_eq!(config.triangular.min_profit_percent, dec!(0.05));
        assert_eq!(config.triangular.min_volume, dec!(20));
        assert_eq!(config.spread.available_capital, dec!(500));
        assert_eq!(config.spread.slippage_protection, dec!(0.8));
        assert_eq!(config.graph.min_volume, dec!(100));
        assert_eq!(config.deposit_fees, DepositFeeTable::default());
        assert_eq!(config.validate(), Ok(()));
    }
}
