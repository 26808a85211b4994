//! Swing-structure scorer: pullbacks to support inside a rising structure.

use crate::config::EngineConfig;
use crate::domain::{
    Bar, MarketRegime, ScoreCap, SectorState, StrategyDetail, StrategyKind, StrategyResult,
    StructureBias,
};
use crate::indicators::{ema_latest, structure_bias};

use super::{
    adx_points, finalize, neutral_result, risk_reward, Draft, MarketSnapshot, Scorecard,
    StrategyContext, StrategyScorer,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingSignals {
    pub structure: StructureBias,
    pub htf_structure: StructureBias,
    pub above_emas: bool,
    pub pullback: bool,
    pub regime: MarketRegime,
    pub volume_ratio: f64,
    pub adx: f64,
    pub risk_reward: f64,
    pub sector: SectorState,
}

/// Swing weight table: structure 20, above EMAs 15, higher-timeframe
/// alignment 15, pullback 15, ADX 15/10, volume ≥1.5 10, R:R ≥2 10, sector
/// 15/10, and −15 in RANGE or WEAK_TREND.
pub fn swing_factors(s: &SwingSignals, cfg: &EngineConfig) -> Scorecard {
    let mut card = Scorecard::new();

    if s.structure == StructureBias::Bullish {
        card.add("structure", 20);
    }
    if s.above_emas {
        card.add("above_emas", 15);
    }
    if s.htf_structure == StructureBias::Bullish {
        card.add("htf_alignment", 15);
    }
    if s.pullback {
        card.add("pullback", 15);
    }
    card.add("adx", adx_points(s.adx, cfg));
    if s.volume_ratio >= 1.5 {
        card.add("volume", 10);
    }
    if s.risk_reward >= 2.0 {
        card.add("risk_reward", 10);
    }
    card.add("sector", s.sector.points());
    if matches!(s.regime, MarketRegime::Range | MarketRegime::WeakTrend) {
        card.add("regime", -15);
    }
    card
}

#[derive(Debug, Clone)]
pub struct SwingScorer {
    cfg: EngineConfig,
}

impl SwingScorer {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }
}

impl StrategyScorer for SwingScorer {
    fn name(&self) -> &str {
        "swing"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Swing
    }

    fn score(&self, bars: &[Bar], ctx: &StrategyContext) -> StrategyResult {
        let cfg = &self.cfg;
        let (ind, scoring) = (&cfg.indicators, &cfg.scoring);
        let snap = MarketSnapshot::capture(bars, cfg);

        let ema20 = ema_latest(bars, ind.ema_fast);
        let ema50 = ema_latest(bars, ind.ema_slow);
        let structure = structure_bias(bars, ind.structure_lookback);

        let Some(last) = bars.last() else {
            return neutral_result(
                StrategyKind::Swing,
                &snap,
                StrategyDetail::Swing {
                    structure,
                    htf_structure: ctx.htf_structure,
                    above_emas: false,
                    pullback: false,
                    ema20: 0.0,
                    ema50: 0.0,
                },
                cfg,
            );
        };
        let cmp = last.close;

        let above_emas = matches!((ema20, ema50), (Some(f), Some(s)) if cmp > f && cmp > s);

        let support = ctx.support_below(cmp);
        let pullback = support.is_some_and(|s| (cmp - s) / cmp <= scoring.pullback_pct);

        let stop_loss = match support {
            Some(s) => s - scoring.level_stop_atr * snap.atr,
            None => cmp * (1.0 - scoring.fallback_stop_pct),
        };
        let two_r = cmp + 2.0 * (cmp - stop_loss);
        let target = ctx
            .level_prices()
            .filter(|p| *p >= two_r)
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(two_r);

        let mut caps = Vec::new();
        if ctx.level_above(cmp).is_none() {
            caps.push(ScoreCap::BlueSky);
        }

        let signals = SwingSignals {
            structure,
            htf_structure: ctx.htf_structure,
            above_emas,
            pullback,
            regime: snap.regime,
            volume_ratio: snap.volume_ratio,
            adx: snap.adx,
            risk_reward: risk_reward(cmp, stop_loss, target),
            sector: ctx.sector,
        };

        finalize(
            Draft {
                kind: StrategyKind::Swing,
                bias: structure.into(),
                stop_loss,
                target,
                card: swing_factors(&signals, cfg),
                caps,
                detail: StrategyDetail::Swing {
                    structure,
                    htf_structure: ctx.htf_structure,
                    above_emas,
                    pullback,
                    ema20: ema20.unwrap_or(0.0),
                    ema50: ema50.unwrap_or(0.0),
                },
            },
            &snap,
            cfg,
        )
    }
}
