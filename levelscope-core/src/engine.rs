//! Engine facade: the public operations callers use.
//!
//! Every function recomputes from the supplied bars and configuration. Nothing
//! is cached between calls, so independent symbols may be processed from any
//! number of threads.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{
    Bar, Classified, Level, LevelSide, ReactionZone, SectorState, StrategyKind, StrategyResult,
    StructuralZone, StructureBias, SwingPoint, Timeframe, ZoneType,
};
use crate::indicators::{atr_latest, average_volume};
use crate::insights::{self, MarketInsights};
use crate::levels::{classify, swing_levels, to_level, ScoringContext};
use crate::strategy::{create_scorer, StrategyContext};
use crate::swing::detect_swings;
use crate::zones::{cluster_swings, detect_structural_zones};

/// Swing-cluster reaction levels around the last close, scored and labelled.
pub fn compute_reaction_levels(
    bars: &[Bar],
    timeframe: Timeframe,
    cfg: &EngineConfig,
) -> Classified<Level> {
    let Some(last) = bars.last() else {
        return Classified::default();
    };
    let rc = &cfg.reaction;

    let swings = detect_swings(bars, rc.swing_window);
    let points: Vec<SwingPoint> = swings.all().copied().collect();
    let atr = atr_latest(bars, cfg.indicators.atr_period).unwrap_or(0.0);
    let zones = cluster_swings(&points, atr, rc.cluster_factor);
    let split = classify(&zones, last.close, rc.max_levels);

    let market_avg = average_volume(bars, rc.market_volume_period);
    let ctx = ScoringContext {
        timeframe,
        as_of: Some(last.timestamp),
        market_avg_volume: (market_avg > 0.0).then_some(market_avg),
    };

    tracing::debug!(
        swings = swings.len(),
        zones = zones.len(),
        supports = split.supports.len(),
        resistances = split.resistances.len(),
        %timeframe,
        "reaction levels"
    );

    Classified {
        supports: split
            .supports
            .into_iter()
            .map(|z| to_level(z, LevelSide::Support, &ctx))
            .collect(),
        resistances: split
            .resistances
            .into_iter()
            .map(|z| to_level(z, LevelSide::Resistance, &ctx))
            .collect(),
    }
}

/// Demand/supply zones that survive merging and the lifecycle scan.
pub fn compute_structural_zones(bars: &[Bar], cfg: &EngineConfig) -> Vec<StructuralZone> {
    detect_structural_zones(bars, &cfg.structural)
}

/// Consolidated wide-window pivot levels around the last close.
pub fn compute_swing_levels(bars: &[Bar], cfg: &EngineConfig) -> Classified<ReactionZone> {
    swing_levels(bars, &cfg.swing_levels)
}

/// Score the newest bar with the scorer for `kind`.
pub fn score_strategy(
    kind: StrategyKind,
    bars: &[Bar],
    ctx: &StrategyContext,
    cfg: &EngineConfig,
) -> StrategyResult {
    create_scorer(kind, cfg).score(bars, ctx)
}

/// Build the scorer context from the levels `kind` trades against.
///
/// Reaction scoring uses reaction levels, swing scoring uses swing levels and
/// demand/supply scoring uses structural zones.
pub fn strategy_context(
    kind: StrategyKind,
    bars: &[Bar],
    sector: SectorState,
    htf_structure: StructureBias,
    cfg: &EngineConfig,
) -> StrategyContext {
    let mut ctx = StrategyContext {
        sector,
        htf_structure,
        ..Default::default()
    };
    match kind {
        StrategyKind::Reaction => {
            let levels = compute_reaction_levels(bars, Timeframe::D1, cfg);
            ctx.supports = levels.supports.iter().map(Level::price).collect();
            ctx.resistances = levels.resistances.iter().map(Level::price).collect();
        }
        StrategyKind::Swing => {
            let levels = compute_swing_levels(bars, cfg);
            ctx.supports = levels.supports.iter().map(|z| z.price).collect();
            ctx.resistances = levels.resistances.iter().map(|z| z.price).collect();
        }
        StrategyKind::Structural => {
            ctx.zones = compute_structural_zones(bars, cfg);
        }
    }
    ctx
}

/// Structural zones arranged for display around the current price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneLevels {
    /// Demand zones entirely below price, highest first.
    pub supports: Vec<StructuralZone>,
    /// Supply zones entirely above price, lowest first.
    pub resistances: Vec<StructuralZone>,
}

pub fn zone_levels(zones: &[StructuralZone], cmp: f64, cap: usize) -> ZoneLevels {
    let mut supports: Vec<StructuralZone> = zones
        .iter()
        .filter(|z| z.zone_type == ZoneType::Demand && z.price_high < cmp)
        .cloned()
        .collect();
    let mut resistances: Vec<StructuralZone> = zones
        .iter()
        .filter(|z| z.zone_type == ZoneType::Supply && z.price_low > cmp)
        .cloned()
        .collect();
    supports.sort_by(|a, b| b.price_high.total_cmp(&a.price_high));
    resistances.sort_by(|a, b| a.price_low.total_cmp(&b.price_low));
    supports.truncate(cap);
    resistances.truncate(cap);
    ZoneLevels {
        supports,
        resistances,
    }
}

/// Candle and trend observations against the series' own reaction levels.
pub fn market_insights(bars: &[Bar], cfg: &EngineConfig) -> MarketInsights {
    let levels = compute_reaction_levels(bars, Timeframe::D1, cfg);
    let supports: Vec<f64> = levels.supports.iter().map(Level::price).collect();
    let resistances: Vec<f64> = levels.resistances.iter().map(Level::price).collect();
    insights::market_insights(bars, &supports, &resistances, cfg)
}
