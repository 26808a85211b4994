//! Structural pivot levels: wide-window pivots consolidated by percentage.

use crate::config::SwingLevelConfig;
use crate::domain::{Bar, Classified, ReactionZone, SwingPoint, Swings};
use crate::swing::detect_swings;
use crate::zones::cluster::zone_from_members;

use super::classifier::classify;

/// Merge pivots, sorted by price, while each one stays within `merge_pct` of
/// the running cluster mean.
pub fn consolidate_pivots(swings: &Swings, merge_pct: f64) -> Vec<ReactionZone> {
    let mut sorted: Vec<&SwingPoint> = swings.all().collect();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut levels = Vec::new();
    let mut current: Vec<&SwingPoint> = Vec::new();
    let mut sum = 0.0;

    for point in sorted {
        if !current.is_empty() {
            let mean = sum / current.len() as f64;
            if (point.price - mean).abs() > mean.abs() * merge_pct {
                levels.push(zone_from_members(&current));
                current.clear();
                sum = 0.0;
            }
        }
        sum += point.price;
        current.push(point);
    }
    if !current.is_empty() {
        levels.push(zone_from_members(&current));
    }
    levels
}

/// Pivot levels around the last close, at most `cfg.max_levels` per side.
pub fn swing_levels(bars: &[Bar], cfg: &SwingLevelConfig) -> Classified<ReactionZone> {
    let Some(last) = bars.last() else {
        return Classified::default();
    };
    let swings = detect_swings(bars, cfg.pivot_window);
    let levels = consolidate_pivots(&swings, cfg.merge_pct);

    tracing::debug!(
        pivots = swings.len(),
        levels = levels.len(),
        "consolidated swing levels"
    );
    classify(&levels, last.close, cfg.max_levels)
}
