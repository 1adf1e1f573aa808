mod analysis;
mod bar;
mod signal;

pub use analysis::{AnalysisResponse, AnalyzeRequest, IndicatorSnapshot, PriceBar, Timeframe};
pub use bar::Bar;
pub use signal::{Decision, SignalFlag, SignalSet, SignalStrength, TradeAction};
