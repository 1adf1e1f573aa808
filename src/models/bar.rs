use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar. Timestamps are UTC, one bar per period, oldest first.
/// The fetched series is immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}
