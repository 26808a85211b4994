//! LevelScope Core: price-structure detection and strategy scoring.
//!
//! This crate is the stateless engine:
//! - Domain types (bars, swing points, reaction and structural zones, results)
//! - Technical feature library (ATR, RSI, ADX, EMA bias, structure, volume)
//! - Swing detection, swing-cluster and demand/supply zone builders
//! - Level classification and confidence scoring
//! - Regime detection and three multi-factor strategy scorers
//! - Candle insights and assistive heuristic classifiers
//!
//! Nothing here performs I/O; callers load bars and pass an [`EngineConfig`].

pub mod assist;
pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod insights;
pub mod levels;
pub mod regime;
pub mod strategy;
pub mod swing;
pub mod zones;

pub use config::{ConfigError, EngineConfig};
pub use engine::{
    compute_reaction_levels, compute_structural_zones, compute_swing_levels, market_insights,
    score_strategy, strategy_context,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: records and scorers can cross thread boundaries, so
    /// callers may fan symbols out over a worker pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::SwingPoint>();
        require_sync::<domain::SwingPoint>();
        require_send::<domain::ReactionZone>();
        require_sync::<domain::ReactionZone>();
        require_send::<domain::StructuralZone>();
        require_sync::<domain::StructuralZone>();
        require_send::<domain::Level>();
        require_sync::<domain::Level>();
        require_send::<domain::StrategyResult>();
        require_sync::<domain::StrategyResult>();

        // Configuration and context
        require_send::<EngineConfig>();
        require_sync::<EngineConfig>();
        require_send::<strategy::StrategyContext>();
        require_sync::<strategy::StrategyContext>();

        // Scorers and classifiers
        require_send::<strategy::ReactionScorer>();
        require_sync::<strategy::ReactionScorer>();
        require_send::<strategy::SwingScorer>();
        require_sync::<strategy::SwingScorer>();
        require_send::<strategy::DemandSupplyScorer>();
        require_sync::<strategy::DemandSupplyScorer>();
        require_send::<Box<dyn strategy::StrategyScorer>>();
        require_sync::<Box<dyn strategy::StrategyScorer>>();
        require_send::<Box<dyn assist::BreakoutClassifier>>();
        require_sync::<Box<dyn assist::BreakoutClassifier>>();
    }

    /// Architecture contract: scorers see bars and an explicit context only.
    ///
    /// `score()` takes `&self`, so a scorer cannot accumulate state between
    /// calls; identical inputs give identical results.
    #[test]
    fn scorer_trait_is_stateless() {
        fn _check_trait_object_builds(
            scorer: &dyn strategy::StrategyScorer,
            bars: &[domain::Bar],
            ctx: &strategy::StrategyContext,
        ) -> domain::StrategyResult {
            scorer.score(bars, ctx)
        }
    }
}
