//! Indicator & signal engine.
//!
//! A single pass over the fetched series: compute SMA/RSI/MACD, read the
//! latest bar, derive the signal set from the fixed rule table, count the
//! votes and package the payload. Pure apart from the error on empty input.

use crate::errors::AppError;
use crate::models::{
    AnalysisResponse, Bar, Decision, IndicatorSnapshot, PriceBar, SignalFlag, SignalSet,
    Timeframe, TradeAction,
};
use crate::services::indicators::{macd, rsi, sma};

const SMA_SHORT: usize = 20;
const SMA_LONG: usize = 50;
const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const CHART_BARS: usize = 50;

/// Indicator readings on the latest bar. `None` marks an indicator whose
/// window is not yet full; such an indicator produces no signal flag.
#[derive(Debug, Clone, Copy)]
struct LatestIndicators {
    close: f64,
    sma_20: Option<f64>,
    sma_50: Option<f64>,
    rsi: Option<f64>,
    macd: Option<f64>,
    macd_signal: Option<f64>,
}

/// Analyze a fetched OHLCV series and build the response payload.
///
/// The fetcher already rejects empty histories; an empty input here is
/// still reported as missing data rather than panicking on index math.
pub fn analyze(
    bars: &[Bar],
    symbol: &str,
    timeframe: Timeframe,
) -> Result<AnalysisResponse, AppError> {
    if bars.is_empty() {
        return Err(AppError::NoData(symbol.to_string()));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma_20 = sma(&closes, SMA_SHORT);
    let sma_50 = sma(&closes, SMA_LONG);
    let rsi_14 = rsi(&closes, RSI_PERIOD);
    let (macd_line, macd_signal) = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    let last = closes.len() - 1;
    let latest = LatestIndicators {
        close: closes[last],
        sma_20: sma_20[last],
        sma_50: sma_50[last],
        rsi: rsi_14[last],
        macd: Some(macd_line[last]),
        macd_signal: Some(macd_signal[last]),
    };

    let signals = derive_signals(&latest);
    let decision = Decision::from_counts(signals.bullish_count(), signals.bearish_count());
    let recommendation = narrate(symbol, decision, &signals, &latest);

    let chart_start = bars.len().saturating_sub(CHART_BARS);
    let price_data = bars[chart_start..]
        .iter()
        .map(|b| PriceBar {
            timestamp: b.timestamp.format(timeframe.timestamp_format()).to_string(),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        })
        .collect();

    Ok(AnalysisResponse {
        symbol: symbol.to_string(),
        timeframe,
        current_price: latest.close,
        signal: decision.action,
        signal_strength: decision.strength,
        indicators: IndicatorSnapshot {
            sma_20: latest.sma_20.unwrap_or(0.0),
            sma_50: latest.sma_50.unwrap_or(0.0),
            rsi: latest.rsi.unwrap_or(0.0),
            macd: latest.macd.unwrap_or(0.0),
            macd_signal: latest.macd_signal.unwrap_or(0.0),
        },
        recommendation,
        price_data,
    })
}

/// The fixed rule table. Each rule fires only when its indicators are
/// defined; comparisons tie toward the bearish flag of the pair.
fn derive_signals(latest: &LatestIndicators) -> SignalSet {
    let mut set = SignalSet::default();

    if let (Some(short), Some(long)) = (latest.sma_20, latest.sma_50) {
        set.insert(if short > long {
            SignalFlag::BullishTrend
        } else {
            SignalFlag::BearishTrend
        });
    }

    if let Some(rsi) = latest.rsi {
        if rsi < RSI_OVERSOLD {
            set.insert(SignalFlag::Oversold);
        } else if rsi > RSI_OVERBOUGHT {
            set.insert(SignalFlag::Overbought);
        }
    }

    if let (Some(line), Some(signal)) = (latest.macd, latest.macd_signal) {
        set.insert(if line > signal {
            SignalFlag::MacdBullish
        } else {
            SignalFlag::MacdBearish
        });
    }

    if let Some(short) = latest.sma_20 {
        set.insert(if latest.close > short {
            SignalFlag::PriceAboveSma20
        } else {
            SignalFlag::PriceBelowSma20
        });
    }

    set
}

/// Templated recommendation text. Every flag present in the signal set gets
/// at least one sentence, on top of the lead sentence for the decision.
fn narrate(
    symbol: &str,
    decision: Decision,
    signals: &SignalSet,
    latest: &LatestIndicators,
) -> String {
    let mut sentences = Vec::new();

    match decision.action {
        TradeAction::Buy => {
            sentences.push(format!("Strong buying opportunity detected for {symbol}."));
        }
        TradeAction::Sell => {
            sentences.push(format!("Consider selling or taking profits on {symbol}."));
        }
        TradeAction::Hold => {
            sentences.push(format!(
                "Hold position and wait for clearer signals on {symbol}."
            ));
            sentences.push("Market conditions are neutral or mixed.".to_string());
        }
    }

    if let Some(rsi) = latest.rsi {
        if signals.contains(SignalFlag::Oversold) {
            sentences.push(format!("RSI indicates oversold conditions ({rsi:.2})."));
        } else if signals.contains(SignalFlag::Overbought) {
            sentences.push(format!("RSI indicates overbought conditions ({rsi:.2})."));
        }
    }
    if signals.contains(SignalFlag::BullishTrend) {
        sentences.push("Short-term trend is above long-term trend (bullish).".to_string());
    }
    if signals.contains(SignalFlag::BearishTrend) {
        sentences.push("Short-term trend is below long-term trend (bearish).".to_string());
    }
    if signals.contains(SignalFlag::MacdBullish) {
        sentences.push("MACD crossed above signal line (bullish momentum).".to_string());
    }
    if signals.contains(SignalFlag::MacdBearish) {
        sentences.push("MACD crossed below signal line (bearish momentum).".to_string());
    }
    if signals.contains(SignalFlag::PriceAboveSma20) {
        sentences.push("Price is trading above its 20-period moving average.".to_string());
    }
    if signals.contains(SignalFlag::PriceBelowSma20) {
        sentences.push("Price is trading below its 20-period moving average.".to_string());
    }

    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::SignalStrength;

    fn daily_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect()
    }

    fn defined(close: f64) -> LatestIndicators {
        LatestIndicators {
            close,
            sma_20: Some(close),
            sma_50: Some(close),
            rsi: Some(50.0),
            macd: Some(0.0),
            macd_signal: Some(0.0),
        }
    }

    #[test]
    fn empty_input_is_missing_data() {
        let err = analyze(&[], "AAPL", Timeframe::Daily).unwrap_err();
        assert!(matches!(err, AppError::NoData(ref s) if s == "AAPL"));
    }

    #[test]
    fn flat_series_resolves_bearish_on_every_tie() {
        let bars = daily_bars(&vec![100.0; 60]);
        let resp = analyze(&bars, "FLAT", Timeframe::Daily).unwrap();

        // SMA-20 == SMA-50, MACD == signal and close == SMA-20: all three
        // ties fire the bearish flag of their pair, RSI stays undefined.
        assert_eq!(resp.signal, TradeAction::Sell);
        assert_eq!(resp.signal_strength, SignalStrength::Strong);
        assert_eq!(resp.indicators.sma_20, 100.0);
        assert_eq!(resp.indicators.sma_50, 100.0);
        assert_eq!(resp.indicators.rsi, 0.0);
        assert_eq!(resp.indicators.macd, 0.0);
        assert!(resp.recommendation.contains("Consider selling"));
        assert!(resp.recommendation.contains("below long-term trend"));
    }

    #[test]
    fn rising_series_buys_strong() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let resp = analyze(&daily_bars(&closes), "UP", Timeframe::Daily).unwrap();

        assert_eq!(resp.signal, TradeAction::Buy);
        assert_eq!(resp.signal_strength, SignalStrength::Strong);
        assert_eq!(resp.current_price, 159.0);
        assert!(resp.indicators.sma_20 > resp.indicators.sma_50);
        assert!(resp.indicators.macd > resp.indicators.macd_signal);
        // The uptrend pins RSI above 70; the overbought flag lands on the
        // bearish side of the vote but cannot outrank three bullish flags.
        assert_eq!(resp.indicators.rsi, 100.0);
        assert!(resp.recommendation.contains("overbought"));
        assert!(resp.recommendation.contains("buying opportunity"));
    }

    #[test]
    fn falling_series_sells_strong() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let resp = analyze(&daily_bars(&closes), "DOWN", Timeframe::Daily).unwrap();

        // Oversold RSI votes bullish, but trend, MACD and price-vs-SMA all
        // vote bearish.
        assert_eq!(resp.signal, TradeAction::Sell);
        assert_eq!(resp.signal_strength, SignalStrength::Strong);
        assert!(resp.recommendation.contains("oversold"));
    }

    #[test]
    fn short_history_holds_with_zeroed_snapshot() {
        let closes = vec![100.0, 101.0, 99.0, 102.0, 98.0, 103.0, 97.0, 104.0];
        let resp = analyze(&daily_bars(&closes), "NEW", Timeframe::Daily).unwrap();

        // Too short for SMA-20 and RSI-14: only the MACD pair can fire, so
        // neither side reaches two votes.
        assert_eq!(resp.signal, TradeAction::Hold);
        assert_eq!(resp.signal_strength, SignalStrength::Neutral);
        assert_eq!(resp.indicators.sma_20, 0.0);
        assert_eq!(resp.indicators.sma_50, 0.0);
        assert_eq!(resp.indicators.rsi, 0.0);
        assert!(resp.recommendation.contains("Hold position"));
    }

    #[test]
    fn fewer_than_fifteen_bars_never_fire_an_rsi_flag() {
        for n in 1..15 {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let bars = daily_bars(&closes);
            let resp = analyze(&bars, "X", Timeframe::Daily).unwrap();
            assert!(!resp.recommendation.contains("RSI"), "n = {n}");
        }
    }

    #[test]
    fn chart_keeps_the_last_fifty_bars() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
        let resp = analyze(&daily_bars(&closes), "LONG", Timeframe::Daily).unwrap();

        assert_eq!(resp.price_data.len(), 50);
        assert_eq!(resp.price_data.last().unwrap().close, 219.0);
        assert_eq!(resp.price_data.first().unwrap().close, 170.0);
    }

    #[test]
    fn chart_is_shorter_when_input_is() {
        let resp = analyze(&daily_bars(&[100.0, 101.0]), "S", Timeframe::Daily).unwrap();
        assert_eq!(resp.price_data.len(), 2);
    }

    #[test]
    fn timestamps_follow_the_timeframe_format() {
        let bars = daily_bars(&[100.0, 101.0]);

        let daily = analyze(&bars, "T", Timeframe::Daily).unwrap();
        assert_eq!(daily.price_data[0].timestamp, "2024-01-01");

        let intraday = analyze(&bars, "T", Timeframe::Intraday15m).unwrap();
        assert_eq!(intraday.price_data[0].timestamp, "2024-01-01 00:00");
    }

    #[test]
    fn analysis_is_deterministic() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + ((i as f64) * 0.3).sin() * 4.0)
            .collect();
        let bars = daily_bars(&closes);

        let a = analyze(&bars, "SAME", Timeframe::Daily).unwrap();
        let b = analyze(&bars, "SAME", Timeframe::Daily).unwrap();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn trend_rule_follows_the_sma_pair() {
        let mut latest = defined(100.0);
        latest.sma_20 = Some(101.0);
        latest.sma_50 = Some(100.0);
        assert!(derive_signals(&latest).contains(SignalFlag::BullishTrend));

        latest.sma_20 = Some(100.0);
        assert!(derive_signals(&latest).contains(SignalFlag::BearishTrend));

        latest.sma_50 = None;
        let set = derive_signals(&latest);
        assert!(!set.contains(SignalFlag::BullishTrend));
        assert!(!set.contains(SignalFlag::BearishTrend));
    }

    #[test]
    fn rsi_rule_only_fires_at_the_extremes() {
        let mut latest = defined(100.0);

        latest.rsi = Some(29.9);
        assert!(derive_signals(&latest).contains(SignalFlag::Oversold));

        latest.rsi = Some(70.1);
        assert!(derive_signals(&latest).contains(SignalFlag::Overbought));

        for neutral in [30.0, 50.0, 70.0] {
            latest.rsi = Some(neutral);
            let set = derive_signals(&latest);
            assert!(!set.contains(SignalFlag::Oversold));
            assert!(!set.contains(SignalFlag::Overbought));
        }

        latest.rsi = None;
        let set = derive_signals(&latest);
        assert!(!set.contains(SignalFlag::Oversold));
        assert!(!set.contains(SignalFlag::Overbought));
    }

    #[test]
    fn macd_rule_ties_bearish() {
        let mut latest = defined(100.0);
        latest.macd = Some(1.0);
        latest.macd_signal = Some(0.5);
        assert!(derive_signals(&latest).contains(SignalFlag::MacdBullish));

        latest.macd_signal = Some(1.0);
        assert!(derive_signals(&latest).contains(SignalFlag::MacdBearish));
    }

    #[test]
    fn price_rule_compares_close_to_short_sma() {
        let mut latest = defined(100.0);
        latest.sma_20 = Some(99.0);
        assert!(derive_signals(&latest).contains(SignalFlag::PriceAboveSma20));

        latest.sma_20 = Some(100.0);
        assert!(derive_signals(&latest).contains(SignalFlag::PriceBelowSma20));
    }

    #[test]
    fn no_defined_indicators_means_no_flags() {
        let latest = LatestIndicators {
            close: 100.0,
            sma_20: None,
            sma_50: None,
            rsi: None,
            macd: None,
            macd_signal: None,
        };
        assert!(derive_signals(&latest).is_empty());
    }
}
