//! Level classification and scoring.

pub mod classifier;
pub mod confidence;
pub mod swing_levels;

pub use classifier::{classify, nearest_resistance, nearest_support};
pub use confidence::{score_zone, to_level, ScoringContext};
pub use swing_levels::{consolidate_pivots, swing_levels};
