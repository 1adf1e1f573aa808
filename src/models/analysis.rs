use serde::{Deserialize, Serialize};

use crate::models::signal::{SignalStrength, TradeAction};

/// Supported history windows: 7 days of 15-minute bars, or a year of
/// daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    Intraday15m,
    #[serde(rename = "1d")]
    Daily,
}

impl Timeframe {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "15m" => Some(Timeframe::Intraday15m),
            "1d" => Some(Timeframe::Daily),
            _ => None,
        }
    }

    /// Chart API `range` parameter.
    pub fn range(self) -> &'static str {
        match self {
            Timeframe::Intraday15m => "7d",
            Timeframe::Daily => "1y",
        }
    }

    /// Chart API `interval` parameter.
    pub fn interval(self) -> &'static str {
        match self {
            Timeframe::Intraday15m => "15m",
            Timeframe::Daily => "1d",
        }
    }

    /// strftime pattern used for bar timestamps in the response payload.
    pub fn timestamp_format(self) -> &'static str {
        match self {
            Timeframe::Intraday15m => "%Y-%m-%d %H:%M",
            Timeframe::Daily => "%Y-%m-%d",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.interval())
    }
}

/// Body of `POST /analyze`. The timeframe stays a raw string here so that
/// unsupported values surface as a validation error, not a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

fn default_timeframe() -> String {
    "15m".to_string()
}

/// Latest indicator values as returned to the caller. Undefined indicators
/// are substituted with 0, so callers cannot distinguish a literal zero
/// from "not enough history". Documented lossy convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub sma_20: f64,
    pub sma_50: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

/// One bar of the recent-history chart, timestamp already formatted for the
/// requested timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Full payload of a single analysis. Built fresh per request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub current_price: f64,
    pub signal: TradeAction,
    pub signal_strength: SignalStrength,
    pub indicators: IndicatorSnapshot,
    pub recommendation: String,
    pub price_data: Vec<PriceBar>,
}
