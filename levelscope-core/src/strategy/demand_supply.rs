//! Demand/supply scorer: long entries off the nearest demand zone below price.

use crate::config::EngineConfig;
use crate::domain::{
    Bar, Bias, MarketRegime, SectorState, StrategyDetail, StrategyKind, StrategyResult,
    StructuralZone, ZoneType,
};

use super::{
    adx_points, finalize, neutral_result, risk_reward, Draft, MarketSnapshot, Scorecard,
    StrategyContext, StrategyScorer,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandSupplySignals {
    pub zone_strength: f64,
    pub tight_zone: bool,
    pub regime: MarketRegime,
    pub volume_ratio: f64,
    pub adx: f64,
    pub risk_reward: f64,
    pub sector: SectorState,
}

pub fn demand_supply_factors(s: &DemandSupplySignals, cfg: &EngineConfig) -> Scorecard {
    let mut card = Scorecard::new();
    card.add("zone_strength", if s.zone_strength >= 2.0 { 20 } else { 10 });
    if s.tight_zone {
        card.add("tight_zone", 15);
    }
    card.add("adx", adx_points(s.adx, cfg));
    if s.volume_ratio >= 1.5 {
        card.add("volume", 15);
    }
    if s.risk_reward >= 2.0 {
        card.add("risk_reward", 15);
    }
    card.add("sector", s.sector.points());
    if s.regime == MarketRegime::StrongDowntrend {
        card.add("regime", -20);
    }
    card
}

/// Demand zone with the highest upper bound among those starting below `cmp`.
pub fn active_demand_zone(zones: &[StructuralZone], cmp: f64) -> Option<&StructuralZone> {
    zones
        .iter()
        .filter(|z| z.zone_type == ZoneType::Demand && z.price_low < cmp)
        .max_by(|a, b| a.price_high.total_cmp(&b.price_high))
}

#[derive(Debug, Clone)]
pub struct DemandSupplyScorer {
    cfg: EngineConfig,
}

impl DemandSupplyScorer {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }
}

impl StrategyScorer for DemandSupplyScorer {
    fn name(&self) -> &str {
        "demand_supply"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Structural
    }

    fn score(&self, bars: &[Bar], ctx: &StrategyContext) -> StrategyResult {
        let cfg = &self.cfg;
        let snap = MarketSnapshot::capture(bars, cfg);
        let cmp = snap.cmp;

        let zone = bars
            .last()
            .and_then(|_| active_demand_zone(&ctx.zones, cmp))
            .cloned();
        let Some(zone) = zone else {
            tracing::debug!(zones = ctx.zones.len(), "no demand zone below price");
            return neutral_result(
                StrategyKind::Structural,
                &snap,
                StrategyDetail::Structural { zone: None },
                cfg,
            );
        };

        let stop_loss = zone.distal() - cfg.scoring.zone_stop_atr * snap.atr;
        let target = cmp + 2.0 * (cmp - stop_loss);

        let signals = DemandSupplySignals {
            zone_strength: zone.strength,
            tight_zone: snap.atr > 0.0 && zone.width() <= snap.atr,
            regime: snap.regime,
            volume_ratio: snap.volume_ratio,
            adx: snap.adx,
            risk_reward: risk_reward(cmp, stop_loss, target),
            sector: ctx.sector,
        };

        finalize(
            Draft {
                kind: StrategyKind::Structural,
                bias: Bias::Bullish,
                stop_loss,
                target,
                card: demand_supply_factors(&signals, cfg),
                caps: Vec::new(),
                detail: StrategyDetail::Structural { zone: Some(zone) },
            },
            &snap,
            cfg,
        )
    }
}
