//! Swing points (pivots) produced by the detector.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwingKind {
    High,
    Low,
}

/// A local extreme confirmed by `window` bars on each side.
///
/// `index` is the position inside the bar window the detector was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub volume: u64,
    pub kind: SwingKind,
}

/// Swing highs and lows, each ordered by bar index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swings {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

impl Swings {
    /// Highs followed by lows.
    pub fn all(&self) -> impl Iterator<Item = &SwingPoint> {
        self.highs.iter().chain(self.lows.iter())
    }

    pub fn len(&self) -> usize {
        self.highs.len() + self.lows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}
