//! Scorer factory: strategy kind to runtime trait object.

use crate::config::EngineConfig;
use crate::domain::StrategyKind;

use super::{DemandSupplyScorer, ReactionScorer, StrategyScorer, SwingScorer};

/// Create the scorer for `kind`, owning a copy of `cfg`.
pub fn create_scorer(kind: StrategyKind, cfg: &EngineConfig) -> Box<dyn StrategyScorer> {
    match kind {
        StrategyKind::Reaction => Box::new(ReactionScorer::new(cfg.clone())),
        StrategyKind::Swing => Box::new(SwingScorer::new(cfg.clone())),
        StrategyKind::Structural => Box::new(DemandSupplyScorer::new(cfg.clone())),
    }
}
