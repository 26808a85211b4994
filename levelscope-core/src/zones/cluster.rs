//! Swing-cluster reaction zones.
//!
//! Pivots are sorted by price and chained: a pivot joins the open cluster when
//! it sits within `atr * factor` of the cluster's last (highest) member.

use crate::domain::{ReactionZone, SwingPoint};

/// Cluster swing points into reaction zones, ordered by ascending price.
///
/// Each zone carries the mean member price as its centroid, min/max member
/// price as bounds, the member count as touches, the newest member timestamp
/// and the mean member volume. A negative or NaN threshold clusters only
/// exactly equal prices.
pub fn cluster_swings(swings: &[SwingPoint], atr: f64, factor: f64) -> Vec<ReactionZone> {
    let mut sorted: Vec<&SwingPoint> = swings.iter().collect();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

    let threshold = {
        let t = atr * factor;
        if t.is_finite() {
            t.max(0.0)
        } else {
            0.0
        }
    };

    let mut zones = Vec::new();
    let mut current: Vec<&SwingPoint> = Vec::new();

    for point in sorted {
        if let Some(tail) = current.last() {
            if point.price - tail.price > threshold {
                zones.push(zone_from_members(&current));
                current.clear();
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        zones.push(zone_from_members(&current));
    }

    tracing::debug!(
        pivots = swings.len(),
        zones = zones.len(),
        threshold,
        "clustered swing pivots"
    );
    zones
}

/// Summarise a non-empty set of pivots as one zone.
pub(crate) fn zone_from_members(members: &[&SwingPoint]) -> ReactionZone {
    let count = members.len() as f64;
    let price = members.iter().map(|p| p.price).sum::<f64>() / count;
    let price_low = members.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let price_high = members
        .iter()
        .map(|p| p.price)
        .fold(f64::NEG_INFINITY, f64::max);

    ReactionZone {
        price,
        price_low,
        price_high,
        touches: members.len(),
        last_touched: members.iter().map(|p| p.timestamp).max(),
        avg_volume: members.iter().map(|p| p.volume as f64).sum::<f64>() / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SwingKind;
    use chrono::NaiveDate;

    fn pivot(price: f64, day: u32, volume: u64) -> SwingPoint {
        SwingPoint {
            index: day as usize,
            price,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            volume,
            kind: SwingKind::High,
        }
    }

    #[test]
    fn chains_within_threshold() {
        let swings = [
            pivot(100.0, 1, 1_000),
            pivot(101.0, 5, 3_000),
            pivot(110.0, 3, 500),
        ];
        let zones = cluster_swings(&swings, 4.0, 0.5);
        assert_eq!(zones.len(), 2);

        let first = &zones[0];
        assert_eq!(first.touches, 2);
        assert_eq!(first.price, 100.5);
        assert_eq!(first.price_low, 100.0);
        assert_eq!(first.price_high, 101.0);
        assert_eq!(first.avg_volume, 2_000.0);
        assert_eq!(first.last_touched, Some(swings[1].timestamp));

        // single trailing member still closes a zone
        assert_eq!(zones[1].touches, 1);
        assert_eq!(zones[1].price, 110.0);
    }

    #[test]
    fn chaining_uses_tail_not_centroid() {
        // 100 → 101.9 → 103.8: each step is within 2.0 of the tail
        let swings = [pivot(100.0, 1, 1), pivot(101.9, 2, 1), pivot(103.8, 3, 1)];
        let zones = cluster_swings(&swings, 4.0, 0.5);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].price_high, 103.8);
    }

    #[test]
    fn empty_input_yields_no_zones() {
        assert!(cluster_swings(&[], 1.0, 0.5).is_empty());
    }

    #[test]
    fn nan_atr_only_merges_equal_prices() {
        let swings = [pivot(100.0, 1, 1), pivot(100.0, 2, 1), pivot(100.5, 3, 1)];
        let zones = cluster_swings(&swings, f64::NAN, 0.5);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].touches, 2);
    }
}
