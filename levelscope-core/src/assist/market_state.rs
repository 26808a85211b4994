//! Short-horizon market state from the feature vector.

use serde::{Deserialize, Serialize};

use super::features::FeatureSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    HighVolatility,
    TrendExhaustionOverbought,
    TrendExhaustionOversold,
    TrendingUp,
    TrendingDown,
    Ranging,
}

impl MarketState {
    pub fn is_trending(&self) -> bool {
        matches!(self, MarketState::TrendingUp | MarketState::TrendingDown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStateReading {
    pub state: MarketState,
    pub reason: String,
}

/// First matching rule wins: volatility, exhaustion, trend, then range.
pub fn classify_market_state(f: &FeatureSet) -> MarketStateReading {
    let (state, reason) = if f.atr_expansion > 2.5 {
        (
            MarketState::HighVolatility,
            format!("Range is {:.2}x ATR; expect wide swings.", f.atr_expansion),
        )
    } else if f.rsi > 70.0 {
        (
            MarketState::TrendExhaustionOverbought,
            format!("RSI {:.1} is overbought.", f.rsi),
        )
    } else if f.rsi < 30.0 {
        (
            MarketState::TrendExhaustionOversold,
            format!("RSI {:.1} is oversold.", f.rsi),
        )
    } else if f.adx > 25.0 {
        if f.dist_from_ema > 0.0 {
            (
                MarketState::TrendingUp,
                format!("ADX {:.1} with price above EMA50.", f.adx),
            )
        } else {
            (
                MarketState::TrendingDown,
                format!("ADX {:.1} with price below EMA50.", f.adx),
            )
        }
    } else {
        (
            MarketState::Ranging,
            format!("ADX {:.1} shows no directional strength.", f.adx),
        )
    };
    MarketStateReading { state, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(atr_expansion: f64, rsi: f64, adx: f64, dist_from_ema: f64) -> FeatureSet {
        FeatureSet {
            vol_ratio: 1.0,
            atr_expansion,
            dist_from_ema,
            rsi,
            adx,
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(classify_market_state(&f(2.6, 80.0, 40.0, 3.0)).state, MarketState::HighVolatility);
        assert_eq!(
            classify_market_state(&f(1.0, 75.0, 40.0, 3.0)).state,
            MarketState::TrendExhaustionOverbought
        );
        assert_eq!(
            classify_market_state(&f(1.0, 25.0, 40.0, -3.0)).state,
            MarketState::TrendExhaustionOversold
        );
        assert_eq!(classify_market_state(&f(1.0, 55.0, 30.0, 2.0)).state, MarketState::TrendingUp);
        assert_eq!(classify_market_state(&f(1.0, 45.0, 30.0, -2.0)).state, MarketState::TrendingDown);
        assert_eq!(classify_market_state(&f(1.0, 50.0, 25.0, 2.0)).state, MarketState::Ranging);
    }

    #[test]
    fn trending_flag() {
        assert!(MarketState::TrendingDown.is_trending());
        assert!(!MarketState::HighVolatility.is_trending());
    }
}
