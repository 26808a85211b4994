//! Strategy scoring: three multi-factor scorers sharing one result shape.
//!
//! Each scorer sums fixed point allotments for the factors it recognises,
//! applies its penalties, clamps to `[0, 100]`, then applies the caps
//! (liquidity for all, blue sky for swing). Entry status and grade are read
//! from the final confidence.
//!
//! Scorers are pure: the same bars, context and configuration always give the
//! same [`StrategyResult`].

pub mod demand_supply;
pub mod factory;
pub mod reaction;
pub mod swing;

pub use demand_supply::{demand_supply_factors, DemandSupplyScorer, DemandSupplySignals};
pub use factory::create_scorer;
pub use reaction::{reaction_factors, ReactionScorer, ReactionSignals};
pub use swing::{swing_factors, SwingScorer, SwingSignals};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{
    Bar, Bias, EntryStatus, FactorContribution, MarketRegime, ScoreCap, SectorState,
    StrategyDetail, StrategyKind, StrategyMetrics, StrategyResult, StructureBias, StructuralZone,
};
use crate::indicators::{adx_latest, atr_latest, average_volume, rsi_latest, volume_ratio};
use crate::insights::round2;
use crate::regime::detect_regime;

/// Everything a scorer needs besides the bars themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyContext {
    pub sector: SectorState,
    /// Structure bias of the next higher timeframe.
    pub htf_structure: StructureBias,
    /// Support prices, any order.
    pub supports: Vec<f64>,
    /// Resistance prices, any order.
    pub resistances: Vec<f64>,
    pub zones: Vec<StructuralZone>,
}

impl StrategyContext {
    /// Support and resistance prices together.
    pub fn level_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.supports.iter().chain(&self.resistances).copied()
    }

    /// Highest support strictly below `price`. Resistances never anchor a
    /// stop, even after price has cleared them.
    pub fn support_below(&self, price: f64) -> Option<f64> {
        self.supports
            .iter()
            .copied()
            .filter(|p| *p < price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
    }

    /// Lowest known level strictly above `price`.
    pub fn level_above(&self, price: f64) -> Option<f64> {
        self.level_prices()
            .filter(|p| *p > price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
    }
}

/// Trait for strategy scorers.
pub trait StrategyScorer: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> StrategyKind;

    /// Score the newest bar of `bars`.
    fn score(&self, bars: &[Bar], ctx: &StrategyContext) -> StrategyResult;
}

/// Indicator readings every scorer reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub cmp: f64,
    pub atr: f64,
    pub adx: f64,
    pub rsi: f64,
    pub volume_ratio: f64,
    pub average_volume: f64,
    pub regime: MarketRegime,
}

impl MarketSnapshot {
    pub fn capture(bars: &[Bar], cfg: &EngineConfig) -> Self {
        let ind = &cfg.indicators;
        Self {
            cmp: bars.last().map_or(0.0, |b| b.close),
            atr: atr_latest(bars, ind.atr_period).unwrap_or(0.0),
            adx: adx_latest(bars, ind.adx_period),
            rsi: rsi_latest(bars, ind.rsi_period),
            volume_ratio: volume_ratio(bars, ind.volume_period),
            average_volume: average_volume(bars, cfg.scoring.liquidity_period),
            regime: detect_regime(bars, cfg),
        }
    }
}

/// Named point contributions in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scorecard {
    factors: Vec<FactorContribution>,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a factor; zero-point factors are not listed.
    pub fn add(&mut self, name: &str, points: i32) {
        if points != 0 {
            self.factors.push(FactorContribution::new(name, points));
        }
    }

    pub fn total(&self) -> i32 {
        self.factors.iter().map(|f| f.points).sum()
    }

    pub fn factors(&self) -> &[FactorContribution] {
        &self.factors
    }

    pub fn into_factors(self) -> Vec<FactorContribution> {
        self.factors
    }
}

/// 15 / 10 / 0 for ADX at or above the strong / weak regime thresholds.
pub fn adx_points(adx: f64, cfg: &EngineConfig) -> i32 {
    if adx >= cfg.regime.strong_adx {
        15
    } else if adx >= cfg.regime.weak_adx {
        10
    } else {
        0
    }
}

/// Reward over risk for a long entry at `cmp`, rounded to 2 dp. Zero when
/// there is no risk to measure.
pub fn risk_reward(cmp: f64, stop: f64, target: f64) -> f64 {
    let risk = cmp - stop;
    if risk > 0.0 && risk.is_finite() {
        round2((target - cmp) / risk)
    } else {
        0.0
    }
}

/// A scored setup before clamping and caps.
pub(crate) struct Draft {
    pub kind: StrategyKind,
    pub bias: Bias,
    pub stop_loss: f64,
    pub target: f64,
    pub card: Scorecard,
    /// Caps raised by the scorer itself.
    pub caps: Vec<ScoreCap>,
    pub detail: StrategyDetail,
}

/// Clamp, cap and grade a draft.
pub(crate) fn finalize(draft: Draft, snap: &MarketSnapshot, cfg: &EngineConfig) -> StrategyResult {
    let scoring = &cfg.scoring;
    let raw_score = draft.card.total();
    let mut confidence = raw_score.clamp(0, 100) as u8;

    let mut caps = draft.caps;
    if caps.contains(&ScoreCap::BlueSky) {
        confidence = confidence.min(scoring.blue_sky_cap);
    }
    if snap.average_volume < scoring.liquidity_floor {
        confidence = confidence.min(scoring.liquidity_cap);
        caps.push(ScoreCap::Liquidity);
    }

    let result = StrategyResult {
        kind: draft.kind,
        bias: draft.bias,
        entry_status: EntryStatus::from_confidence(confidence),
        stop_loss: round2(draft.stop_loss),
        target: round2(draft.target),
        risk_reward: risk_reward(snap.cmp, draft.stop_loss, draft.target),
        confidence,
        grade: scoring.grade_scale.grade(confidence),
        metrics: StrategyMetrics {
            atr: round2(snap.atr),
            adx: round2(snap.adx),
            rsi: round2(snap.rsi),
            volume_ratio: round2(snap.volume_ratio),
            average_volume: snap.average_volume.round(),
            regime: snap.regime,
            raw_score,
            factors: draft.card.into_factors(),
            caps,
            detail: draft.detail,
        },
    };

    tracing::debug!(
        kind = %result.kind,
        raw_score,
        confidence = result.confidence,
        status = ?result.entry_status,
        grade = %result.grade,
        "strategy scored"
    );
    result
}

/// Zero-score AVOID result with stop and target pinned to the current price.
pub(crate) fn neutral_result(
    kind: StrategyKind,
    snap: &MarketSnapshot,
    detail: StrategyDetail,
    cfg: &EngineConfig,
) -> StrategyResult {
    finalize(
        Draft {
            kind,
            bias: Bias::Neutral,
            stop_loss: snap.cmp,
            target: snap.cmp,
            card: Scorecard::new(),
            caps: Vec::new(),
            detail,
        },
        snap,
        cfg,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Grade;

    fn snapshot(average_volume: f64) -> MarketSnapshot {
        MarketSnapshot {
            cmp: 100.0,
            atr: 2.0,
            adx: 30.0,
            rsi: 55.0,
            volume_ratio: 1.0,
            average_volume,
            regime: MarketRegime::Trending,
        }
    }

    fn draft(points: i32, caps: Vec<ScoreCap>) -> Draft {
        let mut card = Scorecard::new();
        card.add("everything", points);
        Draft {
            kind: StrategyKind::Swing,
            bias: Bias::Bullish,
            stop_loss: 95.0,
            target: 110.0,
            card,
            caps,
            detail: StrategyDetail::Structural { zone: None },
        }
    }

    #[test]
    fn clamps_and_grades() {
        let cfg = EngineConfig::default();
        let out = finalize(draft(130, vec![]), &snapshot(1e6), &cfg);
        assert_eq!(out.confidence, 100);
        assert_eq!(out.metrics.raw_score, 130);
        assert_eq!(out.entry_status, EntryStatus::StrongEntry);
        assert_eq!(out.grade, Grade::APlus);
        assert_eq!(out.risk_reward, 2.0);

        let out = finalize(draft(-15, vec![]), &snapshot(1e6), &cfg);
        assert_eq!(out.confidence, 0);
        assert_eq!(out.entry_status, EntryStatus::Avoid);
    }

    #[test]
    fn liquidity_cap() {
        let cfg = EngineConfig::default();
        let out = finalize(draft(90, vec![]), &snapshot(150_000.0), &cfg);
        assert_eq!(out.confidence, 55);
        assert_eq!(out.entry_status, EntryStatus::Watchlist);
        assert_eq!(out.grade, Grade::C);
        assert_eq!(out.metrics.caps, vec![ScoreCap::Liquidity]);
    }

    #[test]
    fn blue_sky_cap() {
        let cfg = EngineConfig::default();
        let out = finalize(draft(90, vec![ScoreCap::BlueSky]), &snapshot(1e6), &cfg);
        assert_eq!(out.confidence, 60);
    }

    #[test]
    fn risk_reward_guards() {
        assert_eq!(risk_reward(100.0, 100.0, 110.0), 0.0);
        assert_eq!(risk_reward(100.0, 104.0, 110.0), 0.0);
        assert_eq!(risk_reward(100.0, 97.0, 107.0), 2.33);
    }

    #[test]
    fn context_levels() {
        let ctx = StrategyContext {
            supports: vec![90.0, 95.0],
            resistances: vec![110.0, 105.0],
            ..Default::default()
        };
        assert_eq!(ctx.support_below(100.0), Some(95.0));
        assert_eq!(ctx.level_above(100.0), Some(105.0));
        assert_eq!(ctx.level_above(96.0), Some(105.0));
        assert_eq!(ctx.support_below(90.0), None);
    }

    #[test]
    fn cleared_resistance_is_not_a_support() {
        let ctx = StrategyContext {
            supports: vec![125.5],
            resistances: vec![130.5, 150.0],
            ..Default::default()
        };
        assert_eq!(ctx.support_below(131.0), Some(125.5));
        assert_eq!(ctx.level_above(129.0), Some(130.5));
    }

    #[test]
    fn scorecard_skips_zero() {
        let mut card = Scorecard::new();
        card.add("a", 15);
        card.add("b", 0);
        card.add("c", -20);
        assert_eq!(card.factors().len(), 2);
        assert_eq!(card.total(), -5);
    }
}
