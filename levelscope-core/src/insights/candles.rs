//! Candle pattern predicates on the newest bars.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Engulfing {
    Bullish,
    Bearish,
}

/// Newest bar's range sits strictly inside the prior bar's range.
pub fn is_inside_candle(bars: &[Bar]) -> bool {
    match bars {
        [.., prev, cur] => cur.high < prev.high && cur.low > prev.low,
        _ => false,
    }
}

/// Newest low or high within `pct` (fraction, `0.005` = 0.5%) of any level.
pub fn is_retest(bars: &[Bar], levels: &[f64], pct: f64) -> bool {
    let Some(cur) = bars.last() else {
        return false;
    };
    levels.iter().any(|&price| {
        let margin = price * pct;
        (cur.low - price).abs() <= margin || (cur.high - price).abs() <= margin
    })
}

/// Long lower wick (≥ 2× body) and a negligible upper wick (≤ 10% of range).
pub fn is_hammer(bar: &Bar) -> bool {
    let range = bar.range();
    if range <= 0.0 {
        return false;
    }
    bar.lower_wick() >= 2.0 * bar.body() && bar.upper_wick() <= 0.1 * range
}

/// Newest body engulfs the prior opposite-colour body.
pub fn engulfing(bars: &[Bar]) -> Option<Engulfing> {
    let [.., prev, cur] = bars else {
        return None;
    };
    if cur.is_bullish() && prev.is_bearish() && cur.close > prev.open && cur.open < prev.close {
        return Some(Engulfing::Bullish);
    }
    if cur.is_bearish() && prev.is_bullish() && cur.close < prev.open && cur.open > prev.close {
        return Some(Engulfing::Bearish);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn inside_candle() {
        let bars = make_ohlc_bars(&[(10.0, 12.0, 8.0, 11.0), (11.0, 11.5, 9.0, 10.0)]);
        assert!(is_inside_candle(&bars));
        let bars = make_ohlc_bars(&[(10.0, 12.0, 8.0, 11.0), (11.0, 12.0, 9.0, 10.0)]);
        assert!(!is_inside_candle(&bars));
        assert!(!is_inside_candle(&bars[..1]));
    }

    #[test]
    fn retest_within_half_percent() {
        let bars = make_ohlc_bars(&[(101.0, 102.0, 100.3, 101.5)]);
        assert!(is_retest(&bars, &[100.0], 0.005));
        assert!(!is_retest(&bars, &[99.0], 0.005));
        assert!(!is_retest(&bars, &[], 0.005));
    }

    #[test]
    fn hammer_shape() {
        let hammer = make_ohlc_bars(&[(99.0, 100.0, 90.0, 100.0)]);
        assert!(is_hammer(&hammer[0]));
        let marubozu = make_ohlc_bars(&[(90.0, 100.0, 90.0, 100.0)]);
        assert!(!is_hammer(&marubozu[0]));
        let flat = make_ohlc_bars(&[(100.0, 100.0, 100.0, 100.0)]);
        assert!(!is_hammer(&flat[0]));
    }

    #[test]
    fn engulfing_patterns() {
        let bull = make_ohlc_bars(&[(105.0, 106.0, 99.0, 100.0), (99.0, 108.0, 98.0, 107.0)]);
        assert_eq!(engulfing(&bull), Some(Engulfing::Bullish));

        let bear = make_ohlc_bars(&[(100.0, 106.0, 99.0, 105.0), (106.0, 107.0, 98.0, 99.0)]);
        assert_eq!(engulfing(&bear), Some(Engulfing::Bearish));

        let none = make_ohlc_bars(&[(100.0, 106.0, 99.0, 105.0), (105.0, 107.0, 103.0, 106.0)]);
        assert_eq!(engulfing(&none), None);
    }
}
