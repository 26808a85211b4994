//! Support/resistance reaction scorer: breakouts through and retests of known
//! levels.

use crate::config::EngineConfig;
use crate::domain::{
    Bar, Bias, MarketRegime, SectorState, StrategyDetail, StrategyKind, StrategyResult,
};
use crate::indicators::ema_bias;
use crate::insights::is_retest;

use super::{
    adx_points, finalize, neutral_result, risk_reward, Draft, MarketSnapshot, Scorecard,
    StrategyContext, StrategyScorer,
};

/// Observations the reaction weight table reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionSignals {
    pub breakout: bool,
    pub false_breakout: bool,
    pub retest: bool,
    pub regime: MarketRegime,
    pub volume_ratio: f64,
    pub adx: f64,
    pub risk_reward: f64,
    pub sector: SectorState,
}

/// Reaction weight table.
///
/// | factor               | points                        |
/// |----------------------|-------------------------------|
/// | breakout, not range  | 20                            |
/// | regime confirmation* | 5 (TRENDING, STRONG_UPTREND)  |
/// | retest               | 15                            |
/// | volume ratio         | 15 / 10 for ≥2.0 / ≥1.5       |
/// | ADX                  | 15 / 10                       |
/// | risk:reward          | 15 / 10 for ≥2.0 / ≥1.5       |
/// | sector               | 15 / 10 LEADING / IMPROVING   |
/// | false breakout       | −20                           |
///
/// *Calibration addition outside the base reaction table: it lets a fully
/// aligned trending setup reach 100.
pub fn reaction_factors(s: &ReactionSignals, cfg: &EngineConfig) -> Scorecard {
    let mut card = Scorecard::new();

    if s.breakout && !s.regime.is_rangebound() {
        card.add("breakout", 20);
    }
    if matches!(s.regime, MarketRegime::Trending | MarketRegime::StrongUptrend) {
        card.add("regime", 5);
    }
    if s.retest {
        card.add("retest", 15);
    }
    card.add(
        "volume",
        if s.volume_ratio >= 2.0 {
            15
        } else if s.volume_ratio >= 1.5 {
            10
        } else {
            0
        },
    );
    card.add("adx", adx_points(s.adx, cfg));
    card.add(
        "risk_reward",
        if s.risk_reward >= 2.0 {
            15
        } else if s.risk_reward >= 1.5 {
            10
        } else {
            0
        },
    );
    card.add("sector", s.sector.points());
    if s.false_breakout {
        card.add("false_breakout", -20);
    }
    card
}

#[derive(Debug, Clone)]
pub struct ReactionScorer {
    cfg: EngineConfig,
}

impl ReactionScorer {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }
}

impl StrategyScorer for ReactionScorer {
    fn name(&self) -> &str {
        "reaction"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Reaction
    }

    /// The broken level is the nearest known level above the previous close,
    /// so a level the newest bar just cleared still counts even though it now
    /// sits below price.
    fn score(&self, bars: &[Bar], ctx: &StrategyContext) -> StrategyResult {
        let cfg = &self.cfg;
        let scoring = &cfg.scoring;
        let snap = MarketSnapshot::capture(bars, cfg);

        let [.., prev, last] = bars else {
            return neutral_result(
                StrategyKind::Reaction,
                &snap,
                StrategyDetail::Reaction {
                    breakout: false,
                    false_breakout: false,
                    retest: false,
                    broken_level: None,
                },
                cfg,
            );
        };
        let cmp = last.close;

        let broken_level = ctx
            .level_above(prev.close)
            .filter(|level| cmp > *level && !snap.regime.is_rangebound());
        let breakout = broken_level.is_some();
        let false_breakout = breakout && cmp < prev.high;

        let levels: Vec<f64> = ctx.level_prices().collect();
        let retest = is_retest(bars, &levels, scoring.retest_pct);

        let stop_loss = match ctx.support_below(cmp) {
            Some(support) => support - scoring.level_stop_atr * snap.atr,
            None => cmp * (1.0 - scoring.fallback_stop_pct),
        };
        let target = ctx
            .level_above(cmp)
            .unwrap_or(cmp * (1.0 + scoring.fallback_target_pct));

        let signals = ReactionSignals {
            breakout,
            false_breakout,
            retest,
            regime: snap.regime,
            volume_ratio: snap.volume_ratio,
            adx: snap.adx,
            risk_reward: risk_reward(cmp, stop_loss, target),
            sector: ctx.sector,
        };
        let card = reaction_factors(&signals, cfg);

        let bias = if breakout && !false_breakout {
            Bias::Bullish
        } else {
            ema_bias(bars, cfg.indicators.ema_slow, cfg.indicators.ema_bias_band).into()
        };

        tracing::trace!(?broken_level, retest, false_breakout, "reaction signals");

        finalize(
            Draft {
                kind: StrategyKind::Reaction,
                bias,
                stop_loss,
                target,
                card,
                caps: Vec::new(),
                detail: StrategyDetail::Reaction {
                    breakout,
                    false_breakout,
                    retest,
                    broken_level,
                },
            },
            &snap,
            cfg,
        )
    }
}
