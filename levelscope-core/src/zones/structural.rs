//! Structural demand/supply zones: base → impulse footprints.
//!
//! Pipeline over the newest `window` bars:
//! 1. candidate detection (impulse, strong close, quiet base)
//! 2. same-type merge of heavily overlapping zones
//! 3. forward lifecycle scan (invalidation, touches, time decay)
//!
//! `creation_index` is relative to the analysed window, not the full input.

use crate::config::StructuralConfig;
use crate::domain::{Bar, StructuralZone, ZoneType};
use crate::indicators::{Atr, Indicator};

/// Detect, merge and lifecycle-filter demand/supply zones.
pub fn detect_structural_zones(bars: &[Bar], cfg: &StructuralConfig) -> Vec<StructuralZone> {
    let start = bars.len().saturating_sub(cfg.window);
    let window = &bars[start..];

    let candidates = find_candidates(window, cfg);
    let found = candidates.len();

    let mut merged = merge_zones(candidates.clone(), ZoneType::Demand, cfg.merge_overlap);
    merged.extend(merge_zones(candidates, ZoneType::Supply, cfg.merge_overlap));

    let zones: Vec<StructuralZone> = merged
        .into_iter()
        .filter_map(|zone| apply_lifecycle(zone, window, cfg))
        .collect();

    tracing::debug!(
        bars = window.len(),
        candidates = found,
        kept = zones.len(),
        "structural zones built"
    );
    zones
}

/// Base → impulse candidates in window order, before merging.
pub fn find_candidates(bars: &[Bar], cfg: &StructuralConfig) -> Vec<StructuralZone> {
    let atr = Atr::new(cfg.atr_period).compute(bars);
    let first = cfg.volume_lookback.max(3);
    let mut zones = Vec::new();

    for i in first..bars.len() {
        let impulse = &bars[i];
        let (atr_now, atr_prev) = (atr[i], atr[i - 1]);
        if !atr_now.is_finite() || !atr_prev.is_finite() {
            continue;
        }

        let prior = &bars[i - cfg.volume_lookback..i];
        let avg_volume = prior.iter().map(|b| b.volume as f64).sum::<f64>() / prior.len() as f64;

        if impulse.body() <= cfg.impulse_body_atr * atr_now
            || (impulse.volume as f64) <= cfg.impulse_volume_mult * avg_volume
        {
            continue;
        }

        let zone_type = if impulse.is_bullish() {
            ZoneType::Demand
        } else if impulse.is_bearish() {
            ZoneType::Supply
        } else {
            continue;
        };

        if !strong_close(impulse, &bars[i - 1], zone_type, cfg.max_wick_ratio) {
            tracing::trace!(index = i, "impulse rejected: weak close");
            continue;
        }

        let base_limit = cfg.base_body_atr * atr_prev;
        let quiet = |b: &Bar| b.body() < base_limit;
        if !(quiet(&bars[i - 1]) && quiet(&bars[i - 2])) {
            tracing::trace!(index = i, "impulse rejected: no base");
            continue;
        }

        let mut base = vec![&bars[i - 2], &bars[i - 1]];
        if quiet(&bars[i - 3]) {
            base.push(&bars[i - 3]);
        }

        let (price_low, price_high) = match zone_type {
            ZoneType::Demand => (
                base.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
                base.iter().map(|b| b.body_top()).fold(f64::NEG_INFINITY, f64::max),
            ),
            ZoneType::Supply => (
                base.iter().map(|b| b.body_bottom()).fold(f64::INFINITY, f64::min),
                base.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
            ),
        };

        if price_high - price_low <= 0.0 {
            tracing::trace!(index = i, "impulse rejected: zero-width base");
            continue;
        }

        zones.push(StructuralZone {
            price_low,
            price_high,
            zone_type,
            strength: 1.0,
            creation_index: i,
            touches: 1,
            last_touched: None,
        });
    }

    zones
}

/// Bullish: small upper wick and a close through the prior high.
/// Bearish mirrors on the lower wick and prior low.
fn strong_close(bar: &Bar, prev: &Bar, zone_type: ZoneType, max_wick_ratio: f64) -> bool {
    let range = bar.range();
    if range <= 0.0 {
        return false;
    }
    match zone_type {
        ZoneType::Demand => bar.upper_wick() <= max_wick_ratio * range && bar.close > prev.high,
        ZoneType::Supply => bar.lower_wick() <= max_wick_ratio * range && bar.close < prev.low,
    }
}

/// Merge zones of one type whose overlap exceeds `min_overlap` of the
/// narrower zone. Merged zones take the union of both bands, gain 1.0
/// strength and keep the earliest creation index.
pub fn merge_zones(
    zones: Vec<StructuralZone>,
    zone_type: ZoneType,
    min_overlap: f64,
) -> Vec<StructuralZone> {
    let mut same: Vec<StructuralZone> = zones
        .into_iter()
        .filter(|z| z.zone_type == zone_type)
        .collect();
    same.sort_by(|a, b| a.price_low.total_cmp(&b.price_low));

    let mut merged: Vec<StructuralZone> = Vec::with_capacity(same.len());
    for zone in same {
        if let Some(last) = merged.last_mut() {
            let overlap = last.price_high.min(zone.price_high) - last.price_low.max(zone.price_low);
            let narrower = last.width().min(zone.width());
            if narrower > 0.0 && overlap / narrower > min_overlap {
                last.price_low = last.price_low.min(zone.price_low);
                last.price_high = last.price_high.max(zone.price_high);
                last.strength += 1.0;
                last.creation_index = last.creation_index.min(zone.creation_index);
                continue;
            }
        }
        merged.push(zone);
    }
    merged
}

/// Walk forward from the bar after creation. Returns `None` when the zone is
/// invalidated (close through the distal edge) or exhausted
/// (`max_touches` or more touches).
pub fn apply_lifecycle(
    mut zone: StructuralZone,
    bars: &[Bar],
    cfg: &StructuralConfig,
) -> Option<StructuralZone> {
    for bar in bars.iter().skip(zone.creation_index + 1) {
        let (broken, touched) = match zone.zone_type {
            ZoneType::Demand => (bar.close < zone.distal(), bar.low <= zone.proximal()),
            ZoneType::Supply => (bar.close > zone.distal(), bar.high >= zone.proximal()),
        };
        if broken {
            tracing::trace!(creation = zone.creation_index, "zone invalidated");
            return None;
        }
        if touched {
            zone.touches += 1;
            zone.last_touched = Some(bar.timestamp);
        }
    }

    if zone.touches >= cfg.max_touches {
        tracing::trace!(creation = zone.creation_index, touches = zone.touches, "zone exhausted");
        return None;
    }

    let age = bars.len().saturating_sub(1).saturating_sub(zone.creation_index);
    if age > cfg.decay_age {
        zone.strength /= 2.0;
    }
    Some(zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    fn zone(low: f64, high: f64, zone_type: ZoneType, creation_index: usize) -> StructuralZone {
        StructuralZone {
            price_low: low,
            price_high: high,
            zone_type,
            strength: 1.0,
            creation_index,
            touches: 1,
            last_touched: None,
        }
    }

    #[test]
    fn merge_requires_majority_overlap() {
        let zones = vec![
            zone(100.0, 102.0, ZoneType::Demand, 40),
            zone(100.5, 102.5, ZoneType::Demand, 10), // overlap 1.5 / 2.0
            zone(110.0, 111.0, ZoneType::Demand, 50),
            zone(100.0, 102.0, ZoneType::Supply, 5),
        ];
        let merged = merge_zones(zones, ZoneType::Demand, 0.5);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].price_low, 100.0);
        assert_eq!(merged[0].price_high, 102.5);
        assert_eq!(merged[0].strength, 2.0);
        assert_eq!(merged[0].creation_index, 10);
        assert_eq!(merged[1].strength, 1.0);
    }

    #[test]
    fn merge_rejects_half_overlap() {
        let zones = vec![
            zone(100.0, 102.0, ZoneType::Supply, 1),
            zone(101.0, 103.0, ZoneType::Supply, 2), // exactly 0.5
        ];
        assert_eq!(merge_zones(zones, ZoneType::Supply, 0.5).len(), 2);
    }

    #[test]
    fn lifecycle_counts_touches_and_drops_exhausted() {
        let cfg = StructuralConfig::default();
        let bars = make_ohlc_bars(&[
            (101.0, 101.5, 100.5, 101.0), // creation bar
            (104.0, 105.0, 103.0, 104.5),
            (103.0, 103.5, 101.5, 103.0), // touches proximal 102
            (104.0, 105.0, 103.5, 104.5),
        ]);
        let kept = apply_lifecycle(zone(100.0, 102.0, ZoneType::Demand, 0), &bars, &cfg).unwrap();
        assert_eq!(kept.touches, 2);
        assert_eq!(kept.last_touched, Some(bars[2].timestamp));

        let mut worn = bars.clone();
        worn.push(worn[2]);
        worn.last_mut().unwrap().timestamp += chrono::Duration::days(10);
        assert!(apply_lifecycle(zone(100.0, 102.0, ZoneType::Demand, 0), &worn, &cfg).is_none());
    }

    #[test]
    fn lifecycle_invalidates_on_close_through_distal() {
        let cfg = StructuralConfig::default();
        let bars = make_ohlc_bars(&[
            (101.0, 101.5, 100.5, 101.0),
            (101.0, 101.5, 98.0, 99.0), // close below 100
            (104.0, 105.0, 103.5, 104.5),
        ]);
        assert!(apply_lifecycle(zone(100.0, 102.0, ZoneType::Demand, 0), &bars, &cfg).is_none());

        let supply = zone(110.0, 112.0, ZoneType::Supply, 0);
        let rally = make_ohlc_bars(&[
            (111.0, 111.5, 110.5, 111.0),
            (111.0, 113.0, 110.0, 112.5),
        ]);
        assert!(apply_lifecycle(supply, &rally, &cfg).is_none());
    }

    #[test]
    fn old_zones_decay() {
        let cfg = StructuralConfig::default();
        let bars = make_ohlc_bars(&vec![(120.0, 121.0, 119.0, 120.0); 200]);
        let kept = apply_lifecycle(zone(100.0, 102.0, ZoneType::Demand, 10), &bars, &cfg).unwrap();
        assert_eq!(kept.strength, 0.5);

        let young = apply_lifecycle(zone(100.0, 102.0, ZoneType::Demand, 100), &bars, &cfg).unwrap();
        assert_eq!(young.strength, 1.0);
    }

    #[test]
    fn detects_demand_after_quiet_base() {
        let cfg = StructuralConfig::default();
        let mut data = Vec::new();
        let mut p = 100.0;
        for _ in 0..30 {
            data.push((p, p + 1.2, p - 0.2, p + 1.0));
            p += 1.0;
        }
        // two quiet bars then a wide bullish bar closing on its high
        data.push((p, p + 0.3, p - 0.3, p + 0.1));
        data.push((p + 0.1, p + 0.4, p - 0.2, p));
        data.push((p, p + 6.0, p - 0.1, p + 6.0));
        let mut q = p + 6.0;
        for _ in 0..10 {
            data.push((q, q + 1.2, q - 0.2, q + 1.0));
            q += 1.0;
        }
        let mut bars = make_ohlc_bars(&data);
        bars[32].volume = 10_000;

        let zones = detect_structural_zones(&bars, &cfg);
        assert_eq!(zones.len(), 1);
        let z = &zones[0];
        assert_eq!(z.zone_type, ZoneType::Demand);
        assert_eq!(z.creation_index, 32);
        assert_eq!(z.price_low, p - 0.3);
        assert_eq!(z.price_high, p + 0.1);
        assert_eq!(z.touches, 1);
    }
}
