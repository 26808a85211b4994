//! Assistive analysis: breakout quality, market state and confidence nudges
//! derived from a small feature vector.

pub mod breakout;
pub mod features;
pub mod market_state;
pub mod reliability;

pub use breakout::{
    select_breakout_classifier, BreakoutAssessment, BreakoutClassifier, BreakoutModel,
    BreakoutQuality, ConfidenceBucket, HeuristicBreakout, ModelBlendedBreakout,
};
pub use features::{FeatureSet, MIN_FEATURE_BARS};
pub use market_state::{classify_market_state, MarketState, MarketStateReading};
pub use reliability::{adjust_reliability, ReliabilityAdjustment};

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Range expansion at or below which minor alerts are suppressed.
const QUIET_ATR_EXPANSION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoiseAction {
    None,
    SuppressMinorAlerts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseSuppression {
    /// LOW when the tape is active, HIGH when it is quiet.
    pub level: AlertPriority,
    pub action: NoiseAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub classifier: String,
    pub features: FeatureSet,
    pub breakout: BreakoutAssessment,
    pub market_state: MarketStateReading,
    pub reliability: ReliabilityAdjustment,
    pub priority: AlertPriority,
    pub noise: NoiseSuppression,
}

/// HIGH for a genuine breakout in a trend, LOW for a likely fake.
pub fn alert_priority(state: MarketState, quality: BreakoutQuality) -> AlertPriority {
    match quality {
        BreakoutQuality::LikelyGenuine if state.is_trending() => AlertPriority::High,
        BreakoutQuality::LikelyFake => AlertPriority::Low,
        _ => AlertPriority::Medium,
    }
}

pub fn noise_suppression(f: &FeatureSet) -> NoiseSuppression {
    if f.atr_expansion > QUIET_ATR_EXPANSION {
        NoiseSuppression {
            level: AlertPriority::Low,
            action: NoiseAction::None,
        }
    } else {
        NoiseSuppression {
            level: AlertPriority::High,
            action: NoiseAction::SuppressMinorAlerts,
        }
    }
}

/// Full assistive read of the newest bar. `None` with fewer than 50 bars.
pub fn analyze_market(
    bars: &[Bar],
    base_confidence: u8,
    classifier: &dyn BreakoutClassifier,
) -> Option<MarketAnalysis> {
    let features = FeatureSet::extract(bars)?;
    let breakout = classifier.classify(&features);
    let market_state = classify_market_state(&features);
    let reliability = adjust_reliability(base_confidence, &features);
    let priority = alert_priority(market_state.state, breakout.quality);

    tracing::debug!(
        classifier = classifier.name(),
        quality = ?breakout.quality,
        state = ?market_state.state,
        adjusted = reliability.adjusted,
        "assistive analysis"
    );

    Some(MarketAnalysis {
        classifier: classifier.name().to_string(),
        noise: noise_suppression(&features),
        features,
        breakout,
        market_state,
        reliability,
        priority,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn priority_table() {
        assert_eq!(
            alert_priority(MarketState::TrendingUp, BreakoutQuality::LikelyGenuine),
            AlertPriority::High
        );
        assert_eq!(
            alert_priority(MarketState::Ranging, BreakoutQuality::LikelyGenuine),
            AlertPriority::Medium
        );
        assert_eq!(
            alert_priority(MarketState::TrendingDown, BreakoutQuality::Unclear),
            AlertPriority::Medium
        );
        assert_eq!(
            alert_priority(MarketState::TrendingUp, BreakoutQuality::LikelyFake),
            AlertPriority::Low
        );
    }

    #[test]
    fn short_series_has_no_analysis() {
        let bars = make_ohlc_bars(&vec![(10.0, 11.0, 9.0, 10.0); 10]);
        assert!(analyze_market(&bars, 60, &HeuristicBreakout).is_none());
    }

    #[test]
    fn flat_series() {
        let bars = make_ohlc_bars(&vec![(10.0, 11.0, 9.0, 10.0); 60]);
        let out = analyze_market(&bars, 60, &HeuristicBreakout).unwrap();
        assert_eq!(out.classifier, "heuristic");
        assert_eq!(out.breakout.quality, BreakoutQuality::Unclear);
        assert_eq!(out.market_state.state, MarketState::Ranging);
        assert_eq!(out.priority, AlertPriority::Medium);
        // range equals ATR, so the tape is not quiet
        assert_eq!(out.noise.action, NoiseAction::None);
    }
}
