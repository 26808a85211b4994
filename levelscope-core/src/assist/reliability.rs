//! Feature-based nudges to a base confidence.

use serde::{Deserialize, Serialize};

use super::features::FeatureSet;

/// Largest total adjustment in either direction.
pub const MAX_ADJUSTMENT: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityAdjustment {
    pub base: u8,
    pub adjustment: i32,
    pub adjusted: u8,
    pub reason: String,
}

pub fn adjust_reliability(base: u8, f: &FeatureSet) -> ReliabilityAdjustment {
    let mut delta = 0;
    let mut reasons: Vec<&str> = Vec::new();

    let above = f.dist_from_ema > 0.0;
    let below = f.dist_from_ema < 0.0;
    if (above && f.rsi > 55.0) || (below && f.rsi < 45.0) {
        delta += 2;
        reasons.push("momentum aligned with trend");
    } else if (above && f.rsi < 45.0) || (below && f.rsi > 55.0) {
        delta -= 3;
        reasons.push("momentum diverging from trend");
    }

    if f.adx > 30.0 {
        delta += 2;
        reasons.push("strong trend");
    } else if f.adx < 15.0 {
        delta -= 2;
        reasons.push("weak trend");
    }

    if f.vol_ratio > 1.8 {
        delta += 2;
        reasons.push("volume confirmation");
    }
    if f.atr_expansion > 2.8 {
        delta -= 3;
        reasons.push("volatility spike");
    }

    let adjustment = delta.clamp(-MAX_ADJUSTMENT, MAX_ADJUSTMENT);
    let adjusted = (i32::from(base) + adjustment).clamp(0, 100) as u8;

    ReliabilityAdjustment {
        base,
        adjustment,
        adjusted,
        reason: if reasons.is_empty() {
            "No major adjustments.".to_string()
        } else {
            reasons.join("; ")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(vol_ratio: f64, atr_expansion: f64, dist_from_ema: f64, rsi: f64, adx: f64) -> FeatureSet {
        FeatureSet {
            vol_ratio,
            atr_expansion,
            dist_from_ema,
            rsi,
            adx,
        }
    }

    #[test]
    fn aligned_strong_trend() {
        let out = adjust_reliability(70, &f(2.0, 1.0, 2.0, 60.0, 35.0));
        assert_eq!(out.adjustment, 6);
        assert_eq!(out.adjusted, 76);
        assert_eq!(out.reason, "momentum aligned with trend; strong trend; volume confirmation");
    }

    #[test]
    fn divergent_weak_spiky() {
        let out = adjust_reliability(5, &f(1.0, 3.0, -1.0, 60.0, 10.0));
        assert_eq!(out.adjustment, -8);
        assert_eq!(out.adjusted, 0);
    }

    #[test]
    fn clamped_to_hundred() {
        let out = adjust_reliability(98, &f(2.0, 1.0, 2.0, 60.0, 35.0));
        assert_eq!(out.adjusted, 100);
    }

    #[test]
    fn quiet_features() {
        let out = adjust_reliability(50, &f(1.0, 1.0, 0.0, 50.0, 20.0));
        assert_eq!(out.adjustment, 0);
        assert_eq!(out.reason, "No major adjustments.");
    }
}
