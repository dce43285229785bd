//! Error types for feed normalization.

use spotarb_core::{Exchange, UnknownExchange};
use thiserror::Error;

/// Errors that reject a whole exchange response.
///
/// Problems with individual tickers are never errors; they are counted in
/// `NormalizeStats`.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{exchange} API error: {message}")]
    Api { exchange: Exchange, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Unexpected {exchange} response shape: {detail}")]
    UnexpectedShape {
        exchange: Exchange,
        detail: &'static str,
    },

    #[error("Exchange not supported: {0}")]
    UnsupportedExchange(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl From<UnknownExchange> for FeedError {
    fn from(err: UnknownExchange) -> Self {
        FeedError::UnsupportedExchange(err.0)
    }
}

impl FeedError {
    /// Returns true if fetching the same endpoint again may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::Api { .. })
    }

    /// Returns true if the error will not go away without a code or config change.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            FeedError::UnsupportedExchange(_) | FeedError::UnexpectedShape { .. }
        )
    }
}
