//! Classified levels: zones tagged SUPPORT/RESISTANCE and scored.

use serde::{Deserialize, Serialize};

use super::timeframe::Timeframe;
use super::zone::ReactionZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelSide {
    Support,
    Resistance,
}

/// Human-readable bucket for a 0–100 confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Weak,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl ConfidenceLabel {
    /// `<30` Weak, `<60` Moderate, `<80` Strong, otherwise Very Strong.
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            ConfidenceLabel::Weak
        } else if score < 60.0 {
            ConfidenceLabel::Moderate
        } else if score < 80.0 {
            ConfidenceLabel::Strong
        } else {
            ConfidenceLabel::VeryStrong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::Weak => "Weak",
            ConfidenceLabel::Moderate => "Moderate",
            ConfidenceLabel::Strong => "Strong",
            ConfidenceLabel::VeryStrong => "Very Strong",
        }
    }
}

/// A reaction zone placed relative to CMP with its reliability attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(flatten)]
    pub zone: ReactionZone,
    pub side: LevelSide,
    pub timeframe: Timeframe,
    pub confidence: f64,
    pub label: ConfidenceLabel,
}

impl Level {
    pub fn price(&self) -> f64 {
        self.zone.price
    }
}

/// Output of the level classifier, each side ordered nearest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classified<Z> {
    pub supports: Vec<Z>,
    pub resistances: Vec<Z>,
}

impl<Z> Default for Classified<Z> {
    fn default() -> Self {
        Self {
            supports: Vec::new(),
            resistances: Vec::new(),
        }
    }
}

impl<Z> Classified<Z> {
    pub fn is_empty(&self) -> bool {
        self.supports.is_empty() && self.resistances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.supports.len() + self.resistances.len()
    }
}
