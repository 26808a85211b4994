//! Market structure bias from the two most recent pivot highs and lows.

use crate::domain::{Bar, StructureBias};
use crate::swing::detect_swings;

/// Bars required before structure is read at all.
pub const MIN_STRUCTURE_BARS: usize = 20;

/// Pivot window on each side (a 5-bar pattern).
const PIVOT_WINDOW: usize = 2;

/// BULLISH when both the last two pivot highs and the last two pivot lows
/// rise, BEARISH when both fall, otherwise NEUTRAL.
///
/// Only the newest `lookback` bars are examined. Fewer than 20 bars, or fewer
/// than two pivots of either kind, is NEUTRAL.
pub fn structure_bias(bars: &[Bar], lookback: usize) -> StructureBias {
    if bars.len() < MIN_STRUCTURE_BARS {
        return StructureBias::Neutral;
    }

    let start = bars.len().saturating_sub(lookback.max(MIN_STRUCTURE_BARS));
    let swings = detect_swings(&bars[start..], PIVOT_WINDOW);

    let (highs, lows) = (&swings.highs, &swings.lows);
    if highs.len() < 2 || lows.len() < 2 {
        return StructureBias::Neutral;
    }

    let (h1, h2) = (highs[highs.len() - 2].price, highs[highs.len() - 1].price);
    let (l1, l2) = (lows[lows.len() - 2].price, lows[lows.len() - 1].price);

    if h2 > h1 && l2 > l1 {
        StructureBias::Bullish
    } else if h2 < h1 && l2 < l1 {
        StructureBias::Bearish
    } else {
        StructureBias::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, make_ohlc_bars};

    /// Zig-zag with a drift: one peak and one trough per 4 bars, shifted by
    /// `step` per cycle.
    fn zigzag(cycles: usize, step: f64) -> Vec<Bar> {
        let mut data = Vec::new();
        for c in 0..cycles {
            let base = 100.0 + c as f64 * step;
            for mid in [base, base + 2.0, base + 4.0, base + 2.0] {
                data.push((mid, mid + 1.0, mid - 1.0, mid));
            }
        }
        make_ohlc_bars(&data)
    }

    #[test]
    fn rising_pivots_are_bullish() {
        assert_eq!(structure_bias(&zigzag(10, 1.0), 60), StructureBias::Bullish);
    }

    #[test]
    fn falling_pivots_are_bearish() {
        assert_eq!(structure_bias(&zigzag(10, -1.0), 60), StructureBias::Bearish);
    }

    #[test]
    fn flat_series_is_neutral() {
        let bars = make_bars(&vec![100.0; 120]);
        assert_eq!(structure_bias(&bars, 60), StructureBias::Neutral);
    }

    #[test]
    fn short_series_is_neutral() {
        assert_eq!(structure_bias(&zigzag(4, 1.0), 60), StructureBias::Neutral);
    }
}
