//! Market-context enums shared by indicators, regime detection and scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Direction implied by the last two pivot highs and lows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureBias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl FromStr for StructureBias {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BULLISH" => Ok(StructureBias::Bullish),
            "BEARISH" => Ok(StructureBias::Bearish),
            "NEUTRAL" => Ok(StructureBias::Neutral),
            _ => Err(ParseError::new("structure bias", s)),
        }
    }
}

/// Close versus EMA with a dead-band around equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmaBias {
    Bullish,
    Caution,
    #[default]
    Neutral,
}

/// Trend regime from ADX strength plus EMA20/EMA50 ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    StrongUptrend,
    StrongDowntrend,
    Trending,
    WeakTrend,
    Range,
    /// Not enough bars to classify.
    #[default]
    Unknown,
}

impl MarketRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketRegime::StrongUptrend => "STRONG_UPTREND",
            MarketRegime::StrongDowntrend => "STRONG_DOWNTREND",
            MarketRegime::Trending => "TRENDING",
            MarketRegime::WeakTrend => "WEAK_TREND",
            MarketRegime::Range => "RANGE",
            MarketRegime::Unknown => "UNKNOWN",
        }
    }

    /// Range or unclassified: no directional conviction either way.
    pub fn is_rangebound(&self) -> bool {
        matches!(self, MarketRegime::Range | MarketRegime::Unknown)
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketRegime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRONG_UPTREND" => Ok(MarketRegime::StrongUptrend),
            "STRONG_DOWNTREND" => Ok(MarketRegime::StrongDowntrend),
            "TRENDING" => Ok(MarketRegime::Trending),
            "WEAK_TREND" => Ok(MarketRegime::WeakTrend),
            "RANGE" => Ok(MarketRegime::Range),
            "UNKNOWN" => Ok(MarketRegime::Unknown),
            _ => Err(ParseError::new("market regime", s)),
        }
    }
}

/// Sector rotation quadrant, supplied per call by the sector collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectorState {
    Leading,
    Improving,
    Weakening,
    Lagging,
    #[default]
    Neutral,
}

impl SectorState {
    /// Weight-table points for sector alignment.
    pub fn points(&self) -> i32 {
        match self {
            SectorState::Leading => 15,
            SectorState::Improving => 10,
            _ => 0,
        }
    }

    /// Difference-based quadrant: `rs = sector - benchmark`, `rm = rs - prev_rs`.
    ///
    /// A sector whose own return is not positive is never LEADING.
    pub fn from_returns(sector_return: f64, benchmark_return: f64, prev_rs: f64) -> Self {
        let rs = sector_return - benchmark_return;
        let rm = rs - prev_rs;

        if sector_return > 0.0 {
            if rs > 0.0 && rm > 0.0 {
                return SectorState::Leading;
            }
            if rs > 0.0 && rm <= 0.0 {
                return SectorState::Weakening;
            }
        } else {
            if rs > 0.0 && rm > 0.0 {
                return SectorState::Improving;
            }
            if rs <= 0.0 && rm < 0.0 {
                return SectorState::Lagging;
            }
        }
        SectorState::Neutral
    }
}

impl FromStr for SectorState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEADING" => Ok(SectorState::Leading),
            "IMPROVING" => Ok(SectorState::Improving),
            "WEAKENING" => Ok(SectorState::Weakening),
            "LAGGING" => Ok(SectorState::Lagging),
            "NEUTRAL" => Ok(SectorState::Neutral),
            _ => Err(ParseError::new("sector state", s)),
        }
    }
}

/// Overall directional bias reported with a strategy result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<StructureBias> for Bias {
    fn from(value: StructureBias) -> Self {
        match value {
            StructureBias::Bullish => Bias::Bullish,
            StructureBias::Bearish => Bias::Bearish,
            StructureBias::Neutral => Bias::Neutral,
        }
    }
}

impl From<EmaBias> for Bias {
    fn from(value: EmaBias) -> Self {
        match value {
            EmaBias::Bullish => Bias::Bullish,
            EmaBias::Caution => Bias::Bearish,
            EmaBias::Neutral => Bias::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_improving_when_down_but_outperforming() {
        // sector -3.31%, benchmark -4.20%, prev rs 0.004
        assert_eq!(
            SectorState::from_returns(-0.0331, -0.042, 0.004),
            SectorState::Improving
        );
    }

    #[test]
    fn sector_leading_when_up_and_beating() {
        assert_eq!(
            SectorState::from_returns(0.016, 0.004, 0.008),
            SectorState::Leading
        );
    }

    #[test]
    fn sector_never_leading_when_red() {
        assert_ne!(
            SectorState::from_returns(-0.0001, -0.01, -0.02),
            SectorState::Leading
        );
    }

    #[test]
    fn sector_weakening_and_lagging() {
        assert_eq!(
            SectorState::from_returns(0.01, 0.005, 0.01),
            SectorState::Weakening
        );
        assert_eq!(
            SectorState::from_returns(-0.02, -0.01, 0.0),
            SectorState::Lagging
        );
    }

    #[test]
    fn sector_points() {
        assert_eq!(SectorState::Leading.points(), 15);
        assert_eq!(SectorState::Improving.points(), 10);
        assert_eq!(SectorState::Lagging.points(), 0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("leading".parse::<SectorState>().unwrap(), SectorState::Leading);
        assert_eq!(
            "Bullish".parse::<StructureBias>().unwrap(),
            StructureBias::Bullish
        );
        assert_eq!(
            "weak_trend".parse::<MarketRegime>().unwrap(),
            MarketRegime::WeakTrend
        );
        assert!("SIDEWAYS".parse::<SectorState>().is_err());
    }

    #[test]
    fn regime_serializes_screaming_snake() {
        let json = serde_json::to_string(&MarketRegime::StrongUptrend).unwrap();
        assert_eq!(json, "\"STRONG_UPTREND\"");
        assert_eq!(MarketRegime::WeakTrend.to_string(), "WEAK_TREND");
    }
}
