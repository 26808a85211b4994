//! Domain types for LevelScope

pub mod bar;
pub mod level;
pub mod market;
pub mod strategy;
pub mod swing;
pub mod timeframe;
pub mod zone;

pub use bar::{parse_timestamp, validate_bars, Bar, BarError};
pub use level::{Classified, ConfidenceLabel, Level, LevelSide};
pub use market::{Bias, EmaBias, MarketRegime, SectorState, StructureBias};
pub use strategy::{
    EntryStatus, FactorContribution, Grade, GradeScale, ScoreCap, StrategyDetail, StrategyKind,
    StrategyMetrics, StrategyResult,
};
pub use swing::{SwingKind, SwingPoint, Swings};
pub use timeframe::Timeframe;
pub use zone::{PricedLevel, ReactionZone, StructuralZone, ZoneType};

use thiserror::Error;

/// A string that does not name any variant of a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
