//! Scanner configuration: engine config file plus CLI overrides.

use crate::error::AppError;
use compact_str::CompactString;
use rust_decimal::Decimal;
use spotarb_engine::EngineConfig;
use std::path::Path;
use tracing::info;

/// Thresholds that can be set from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Minimum net spread profit in quote currency.
    pub min_profit: Option<Decimal>,
    /// Capital per spread trade.
    pub capital: Option<Decimal>,
    /// Start currency for triangular cycles.
    pub base: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(min_profit) = self.min_profit {
            config.spread.min_profit = min_profit;
        }
        if let Some(capital) = self.capital {
            config.spread.available_capital = capital;
        }
        if let Some(base) = &self.base {
            config.triangular.start_currency = CompactString::new(base.trim().to_uppercase());
        }
    }
}

pub fn parse_config(text: &str) -> Result<EngineConfig, serde_json::Error> {
    serde_json::from_str(text)
}

/// Load the engine config, apply overrides, and validate the result.
///
/// No path, or a path that does not exist, means defaults.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<EngineConfig, AppError> {
    let mut config = match path {
        Some(path) if path.exists() => {
            let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let config = parse_config(&text).map_err(|source| AppError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loaded config from {}", path.display());
            config
        }
        Some(path) => {
            info!("Config file {} not found, using defaults", path.display());
            EngineConfig::default()
        }
        None => EngineConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}
