use serde::{Deserialize, Serialize};

/// An indicator-derived condition observed on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalFlag {
    BullishTrend,
    BearishTrend,
    Oversold,
    Overbought,
    MacdBullish,
    MacdBearish,
    PriceAboveSma20,
    PriceBelowSma20,
}

const BULLISH_FLAGS: [SignalFlag; 4] = [
    SignalFlag::BullishTrend,
    SignalFlag::Oversold,
    SignalFlag::MacdBullish,
    SignalFlag::PriceAboveSma20,
];

const BEARISH_FLAGS: [SignalFlag; 4] = [
    SignalFlag::BearishTrend,
    SignalFlag::Overbought,
    SignalFlag::MacdBearish,
    SignalFlag::PriceBelowSma20,
];

/// Flags that fired for one request. At most one flag of each opposing pair
/// is present; a pair is absent entirely when its indicators are undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    flags: Vec<SignalFlag>,
}

impl SignalSet {
    pub fn insert(&mut self, flag: SignalFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn contains(&self, flag: SignalFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn bullish_count(&self) -> usize {
        BULLISH_FLAGS.iter().filter(|f| self.contains(**f)).count()
    }

    pub fn bearish_count(&self) -> usize {
        BEARISH_FLAGS.iter().filter(|f| self.contains(**f)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStrength {
    #[serde(rename = "STRONG")]
    Strong,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl std::fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalStrength::Strong => write!(f, "STRONG"),
            SignalStrength::Moderate => write!(f, "MODERATE"),
            SignalStrength::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// The (action, strength) pair output to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: TradeAction,
    pub strength: SignalStrength,
}

impl Decision {
    /// Vote-counting rule over the signal set, evaluated in a fixed priority
    /// order. Bullish thresholds are checked before bearish ones, so a
    /// split vote resolves to the buy side.
    pub fn from_counts(bullish: usize, bearish: usize) -> Self {
        if bullish >= 3 {
            Decision { action: TradeAction::Buy, strength: SignalStrength::Strong }
        } else if bullish >= 2 {
            Decision { action: TradeAction::Buy, strength: SignalStrength::Moderate }
        } else if bearish >= 3 {
            Decision { action: TradeAction::Sell, strength: SignalStrength::Strong }
        } else if bearish >= 2 {
            Decision { action: TradeAction::Sell, strength: SignalStrength::Moderate }
        } else {
            Decision { action: TradeAction::Hold, strength: SignalStrength::Neutral }
        }
    }
}
