//! Exchange responses read from a local directory.
//!
//! Layout, one file per downloaded REST body:
//!
//! - `<exchange>_tickers.json` for each exchange (`okx`, `binance`,
//!   `bitget`, `gate`, `mexc`, `htx`)
//! - `okx_instruments.json` for the OKX spot instrument list

use crate::error::AppError;
use spotarb_core::{Exchange, MarketComparison, MarketSnapshot};
use spotarb_feeds::{comparison_from_batches, normalize_tickers, OkxAdapter, SnapshotSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Inputs for one detection pass.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    /// OKX quotes for triangular search.
    pub snapshot: MarketSnapshot,
    /// Cross-exchange tickers for spread search.
    pub comparison: MarketComparison,
}

pub struct ResponseDir {
    root: PathBuf,
}

impl ResponseDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn tickers_path(&self, exchange: Exchange) -> PathBuf {
        self.root
            .join(format!("{}_tickers.json", exchange.as_str().to_lowercase()))
    }

    pub fn instruments_path(&self) -> PathBuf {
        self.root.join("okx_instruments.json")
    }

    /// File contents, or `None` when the file does not exist.
    fn read_optional(path: &Path) -> Result<Option<String>, AppError> {
        match std::fs::read_to_string(path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} not present", path.display());
                Ok(None)
            }
            Err(source) => Err(AppError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn read_snapshot(&self, taken_at_ms: u64) -> Result<MarketSnapshot, AppError> {
        let tickers = Self::read_optional(&self.tickers_path(Exchange::Okx))?;
        let instruments = Self::read_optional(&self.instruments_path())?;
        let (Some(tickers), Some(instruments)) = (tickers, instruments) else {
            warn!("OKX tickers or instruments missing, triangular search gets no quotes");
            return Ok(MarketSnapshot::new(taken_at_ms, Vec::new()));
        };

        match OkxAdapter::normalize_quotes(&tickers, &instruments) {
            Ok(batch) => Ok(MarketSnapshot::new(taken_at_ms, batch.quotes)),
            Err(e) => {
                warn!("OKX quotes unusable: {}", e);
                Ok(MarketSnapshot::new(taken_at_ms, Vec::new()))
            }
        }
    }

    fn read_comparison(&self) -> Result<MarketComparison, AppError> {
        let mut batches = Vec::new();
        for &exchange in Exchange::all() {
            let Some(body) = Self::read_optional(&self.tickers_path(exchange))? else {
                continue;
            };
            match normalize_tickers(exchange, &body) {
                Ok(batch) => batches.push(batch),
                Err(e) if e.is_permanent() => warn!("{} response rejected: {}", exchange, e),
                Err(e) => warn!("{} response unusable, skipping: {}", exchange, e),
            }
        }
        Ok(comparison_from_batches(&batches))
    }
}

impl SnapshotSource for ResponseDir {
    type Snapshot = MarketData;
    type Error = AppError;

    fn fetch(&mut self) -> Result<MarketData, AppError> {
        let snapshot = self.read_snapshot(now_ms())?;
        let comparison = self.read_comparison()?;
        if snapshot.is_empty() && comparison.is_empty() {
            return Err(AppError::NoMarketData(self.root.clone()));
        }

        info!(
            "Loaded {} OKX quotes and {} pairs from {}",
            snapshot.len(),
            comparison.len(),
            self.root.display()
        );
        Ok(MarketData {
            snapshot,
            comparison,
        })
    }
}
