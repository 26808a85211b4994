//! Feature vector shared by the assistive classifiers.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::{adx_latest, atr_latest, ema_latest, rsi_latest};
use crate::insights::round2;

/// Bars required before any feature is extracted.
pub const MIN_FEATURE_BARS: usize = 50;

const VOLUME_BASELINE: usize = 20;
const ATR_PERIOD: usize = 14;
const EMA_PERIOD: usize = 50;
const RSI_PERIOD: usize = 14;
const ADX_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Newest volume over the mean of the 20 bars before it.
    pub vol_ratio: f64,
    /// Newest range over ATR(14).
    pub atr_expansion: f64,
    /// Percent distance of the close from EMA(50).
    pub dist_from_ema: f64,
    pub rsi: f64,
    pub adx: f64,
}

impl FeatureSet {
    /// `None` with fewer than 50 bars. Every feature is rounded to 2 dp.
    pub fn extract(bars: &[Bar]) -> Option<Self> {
        if bars.len() < MIN_FEATURE_BARS {
            return None;
        }
        let last = bars.last()?;

        let prior = &bars[bars.len() - 1 - VOLUME_BASELINE..bars.len() - 1];
        let baseline = prior.iter().map(|b| b.volume as f64).sum::<f64>() / prior.len() as f64;
        let vol_ratio = if baseline > 0.0 {
            last.volume as f64 / baseline
        } else {
            1.0
        };

        let atr_expansion = match atr_latest(bars, ATR_PERIOD) {
            Some(atr) if atr > 0.0 => last.range() / atr,
            _ => 1.0,
        };

        let dist_from_ema = match ema_latest(bars, EMA_PERIOD) {
            Some(ema) if ema > 0.0 => (last.close - ema) / ema * 100.0,
            _ => 0.0,
        };

        Some(Self {
            vol_ratio: round2(vol_ratio),
            atr_expansion: round2(atr_expansion),
            dist_from_ema: round2(dist_from_ema),
            rsi: round2(rsi_latest(bars, RSI_PERIOD)),
            adx: round2(adx_latest(bars, ADX_PERIOD)),
        })
    }

    /// Model input order: volume ratio, ATR expansion, EMA distance.
    pub fn model_input(&self) -> [f64; 3] {
        [self.vol_ratio, self.atr_expansion, self.dist_from_ema]
    }
}
