//! Market regime classification.

use crate::config::{EngineConfig, RegimeConfig};
use crate::domain::{Bar, MarketRegime};
use crate::indicators::{adx_latest, ema_latest};

/// Classify the trend regime from ADX strength and CMP/EMA20/EMA50 ordering.
///
/// Fewer than `min_bars` bars is UNKNOWN.
pub fn detect_regime(bars: &[Bar], cfg: &EngineConfig) -> MarketRegime {
    let ind = &cfg.indicators;
    let Some(last) = bars.last() else {
        return MarketRegime::Unknown;
    };
    if bars.len() < cfg.regime.min_bars {
        return MarketRegime::Unknown;
    }

    let adx = adx_latest(bars, ind.adx_period);
    let (Some(fast), Some(slow)) = (
        ema_latest(bars, ind.ema_fast),
        ema_latest(bars, ind.ema_slow),
    ) else {
        return MarketRegime::Unknown;
    };

    classify_regime(adx, last.close, fast, slow, &cfg.regime)
}

/// Pure regime table on precomputed inputs.
pub fn classify_regime(
    adx: f64,
    cmp: f64,
    ema_fast: f64,
    ema_slow: f64,
    cfg: &RegimeConfig,
) -> MarketRegime {
    if adx >= cfg.strong_adx {
        if cmp > ema_fast && ema_fast > ema_slow {
            MarketRegime::StrongUptrend
        } else if cmp < ema_fast && ema_fast < ema_slow {
            MarketRegime::StrongDowntrend
        } else {
            MarketRegime::Trending
        }
    } else if adx >= cfg.weak_adx {
        MarketRegime::WeakTrend
    } else {
        MarketRegime::Range
    }
}
