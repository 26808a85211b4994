//! Dashboard-level observations on the newest bars.

pub mod candles;
pub mod summary;

pub use candles::{engulfing, is_hammer, is_inside_candle, is_retest, Engulfing};
pub use summary::{resolve_summary_levels, trade_signal, SignalAction, SummaryLevels, TradeSignal};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{Bar, EmaBias, StructureBias};
use crate::indicators::{adx_latest, ema_bias, structure_bias};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub inside_candle: bool,
    pub retest: bool,
    pub ema_bias: EmaBias,
    pub hammer: bool,
    pub engulfing: Option<Engulfing>,
    /// Distance to the nearest resistance in percent of CMP, 0 without one.
    pub upside_pct: f64,
    pub adx: f64,
    pub structure: StructureBias,
}

/// Candle and trend observations for the newest bar against known level prices.
///
/// `resistances` is expected nearest-first.
pub fn market_insights(
    bars: &[Bar],
    supports: &[f64],
    resistances: &[f64],
    cfg: &EngineConfig,
) -> MarketInsights {
    let ind = &cfg.indicators;
    let levels: Vec<f64> = supports.iter().chain(resistances).copied().collect();

    let upside_pct = match (bars.last(), resistances.first()) {
        (Some(last), Some(&res)) if last.close > 0.0 => {
            round2((res - last.close) / last.close * 100.0)
        }
        _ => 0.0,
    };

    MarketInsights {
        inside_candle: is_inside_candle(bars),
        retest: is_retest(bars, &levels, cfg.scoring.retest_pct),
        ema_bias: ema_bias(bars, ind.ema_slow, ind.ema_bias_band),
        hammer: bars.last().is_some_and(is_hammer),
        engulfing: engulfing(bars),
        upside_pct,
        adx: round2(adx_latest(bars, ind.adx_period)),
        structure: structure_bias(bars, ind.structure_lookback),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
