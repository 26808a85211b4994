//! Reliability score for a reaction level.
//!
//! Additive 0–100 score:
//!
//! | component      | points                                               |
//! |----------------|------------------------------------------------------|
//! | touches        | 10 / 20 / 30 for 1 / 2 / ≥3                          |
//! | timeframe      | 5 – 20, see [`Timeframe::confidence_weight`]         |
//! | recency        | 15 inside the window, 5 inside twice the window      |
//! | volume         | 15 / 10 / 5 for ≥1.5× / ≥1.2× / >1× market average   |
//! | round number   | 20 / 15 / 10 / 5 exact, 8 / 3 near a hundred / ten   |

use chrono::NaiveDateTime;

use crate::domain::{ConfidenceLabel, Level, LevelSide, ReactionZone, Timeframe};

/// Inputs that come from the whole series rather than the zone itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    pub timeframe: Timeframe,
    /// Timestamp of the newest bar; recency is skipped without it.
    pub as_of: Option<NaiveDateTime>,
    /// Average bar volume over the series.
    pub market_avg_volume: Option<f64>,
}

pub fn touch_points(touches: usize) -> f64 {
    match touches {
        0 => 0.0,
        1 => 10.0,
        2 => 20.0,
        _ => 30.0,
    }
}

pub fn recency_points(
    last_touched: Option<NaiveDateTime>,
    as_of: Option<NaiveDateTime>,
    timeframe: Timeframe,
) -> f64 {
    let (Some(touched), Some(as_of)) = (last_touched, as_of) else {
        return 0.0;
    };
    let days = (as_of - touched).num_days();
    let window = timeframe.recency_window_days();
    if days <= window {
        15.0
    } else if days <= window * 2 {
        5.0
    } else {
        0.0
    }
}

pub fn volume_points(zone_volume: f64, market_avg_volume: Option<f64>) -> f64 {
    match market_avg_volume {
        Some(avg) if avg > 0.0 => {
            let ratio = zone_volume / avg;
            if ratio >= 1.5 {
                15.0
            } else if ratio >= 1.2 {
                10.0
            } else if ratio > 1.0 {
                5.0
            } else {
                0.0
            }
        }
        _ if zone_volume > 0.0 => 5.0,
        _ => 0.0,
    }
}

/// Round-number confluence. Prices under 10 earn nothing.
pub fn psychological_points(price: f64) -> f64 {
    if price.is_nan() || price < 10.0 {
        return 0.0;
    }
    if price % 1000.0 == 0.0 {
        20.0
    } else if price % 500.0 == 0.0 {
        15.0
    } else if price % 100.0 == 0.0 {
        10.0
    } else if price % 50.0 == 0.0 {
        5.0
    } else if (price - (price / 100.0).round() * 100.0).abs() <= price * 0.002 {
        8.0
    } else if (price - (price / 10.0).round() * 10.0).abs() <= price * 0.002 {
        3.0
    } else {
        0.0
    }
}

/// Total score for `zone`, clamped to `[0, 100]`.
pub fn score_zone(zone: &ReactionZone, ctx: &ScoringContext) -> f64 {
    let score = touch_points(zone.touches)
        + ctx.timeframe.confidence_weight()
        + recency_points(zone.last_touched, ctx.as_of, ctx.timeframe)
        + volume_points(zone.avg_volume, ctx.market_avg_volume)
        + psychological_points(zone.price);
    score.clamp(0.0, 100.0)
}

/// Attach side, score and label to a zone.
pub fn to_level(zone: ReactionZone, side: LevelSide, ctx: &ScoringContext) -> Level {
    let confidence = score_zone(&zone, ctx);
    Level {
        zone,
        side,
        timeframe: ctx.timeframe,
        confidence,
        label: ConfidenceLabel::from_score(confidence),
    }
}
