//! Strategy scoring output records.
//!
//! A `StrategyResult` is an immutable snapshot: every call to a scorer builds
//! a fresh one from its inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::market::{Bias, MarketRegime, StructureBias};
use super::zone::StructuralZone;
use super::ParseError;

/// Which scorer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    /// Support/resistance breakout and retest.
    Reaction,
    /// Swing structure pullback.
    Swing,
    /// Demand/supply zone.
    Structural,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Reaction,
        StrategyKind::Swing,
        StrategyKind::Structural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Reaction => "REACTION",
            StrategyKind::Swing => "SWING",
            StrategyKind::Structural => "STRUCTURAL",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "reaction" | "sr" | "support-resistance" => Ok(StrategyKind::Reaction),
            "swing" => Ok(StrategyKind::Swing),
            "structural" | "demand-supply" | "ds" | "zones" => Ok(StrategyKind::Structural),
            _ => Err(ParseError::new("strategy kind", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    StrongEntry,
    EntryReady,
    Watchlist,
    Avoid,
}

impl EntryStatus {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            80..=u8::MAX => EntryStatus::StrongEntry,
            65..=79 => EntryStatus::EntryReady,
            50..=64 => EntryStatus::Watchlist,
            _ => EntryStatus::Avoid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        })
    }
}

/// Score-to-grade table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeScale {
    /// `>=90 A+, >=80 A, >=65 B, >=50 C`, aligned with the entry-status cut points.
    #[default]
    Standard,
    /// `>=85 A+, >=75 A, >=65 B, >=55 C`.
    Legacy,
}

impl GradeScale {
    /// Lower bounds for A+, A, B and C.
    pub fn thresholds(&self) -> [u8; 4] {
        match self {
            GradeScale::Standard => [90, 80, 65, 50],
            GradeScale::Legacy => [85, 75, 65, 55],
        }
    }

    pub fn grade(&self, score: u8) -> Grade {
        let [a_plus, a, b, c] = self.thresholds();
        if score >= a_plus {
            Grade::APlus
        } else if score >= a {
            Grade::A
        } else if score >= b {
            Grade::B
        } else if score >= c {
            Grade::C
        } else {
            Grade::D
        }
    }
}

/// One weighted factor and the points it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub name: String,
    pub points: i32,
}

impl FactorContribution {
    pub fn new(name: impl Into<String>, points: i32) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Post-score ceiling applied to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreCap {
    /// Thin trading; 20-bar average volume under the liquidity floor.
    Liquidity,
    /// No overhead resistance to aim at.
    BlueSky,
}

/// Scorer-specific observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyDetail {
    Reaction {
        breakout: bool,
        false_breakout: bool,
        retest: bool,
        broken_level: Option<f64>,
    },
    Swing {
        structure: StructureBias,
        htf_structure: StructureBias,
        above_emas: bool,
        pullback: bool,
        ema20: f64,
        ema50: f64,
    },
    Structural {
        zone: Option<StructuralZone>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    pub atr: f64,
    pub adx: f64,
    pub rsi: f64,
    pub volume_ratio: f64,
    pub average_volume: f64,
    pub regime: MarketRegime,
    /// Sum of factor points, penalties included, before clamping and caps.
    pub raw_score: i32,
    pub factors: Vec<FactorContribution>,
    pub caps: Vec<ScoreCap>,
    pub detail: StrategyDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub kind: StrategyKind,
    pub bias: Bias,
    pub entry_status: EntryStatus,
    pub stop_loss: f64,
    pub target: f64,
    pub risk_reward: f64,
    pub confidence: u8,
    pub grade: Grade,
    pub metrics: StrategyMetrics,
}
