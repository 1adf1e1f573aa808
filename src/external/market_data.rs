use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Bar, Timeframe};

#[derive(Debug, Error)]
pub enum MarketDataError {
    /// The provider had no bars for this symbol in the requested window.
    #[error("No data found for {0}")]
    NoData(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// History source for OHLCV bars. A single best-effort call per request;
/// no caching, no retry.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the bounded history for `timeframe`: 7 days of 15-minute bars
    /// or one year of daily bars, chronological.
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, MarketDataError>;
}
