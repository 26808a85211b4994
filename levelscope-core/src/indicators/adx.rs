//! ADX: Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX smoothing).

use super::atr::{true_range, wilder_smooth};
use super::{last_finite, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();

        if n < 2 {
            return vec![f64::NAN; n];
        }

        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for i in 1..n {
            let (cur, prev) = (&bars[i], &bars[i - 1]);
            if cur.high.is_nan() || cur.low.is_nan() || prev.high.is_nan() || prev.low.is_nan() {
                continue;
            }

            let up = cur.high - prev.high;
            let down = prev.low - cur.low;
            plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
        }

        // TR[0] has no previous close; align its seed with the DM series.
        let mut tr = true_range(bars);
        tr[0] = f64::NAN;
        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus_dm = wilder_smooth(&plus_dm, self.period);
        let smooth_minus_dm = wilder_smooth(&minus_dm, self.period);

        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if smooth_tr[i].is_nan()
                || smooth_plus_dm[i].is_nan()
                || smooth_minus_dm[i].is_nan()
                || smooth_tr[i] == 0.0
            {
                continue;
            }

            let plus_di = 100.0 * smooth_plus_dm[i] / smooth_tr[i];
            let minus_di = 100.0 * smooth_minus_dm[i] / smooth_tr[i];
            let di_sum = plus_di + minus_di;

            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };
        }

        wilder_smooth(&dx, self.period)
    }
}

/// ADX at the newest bar.
///
/// Returns 0.0 with fewer than `2 * period` bars or when the series never
/// leaves warmup (e.g. a perfectly flat window where TR is always zero).
pub fn adx_latest(bars: &[Bar], period: usize) -> f64 {
    let period = period.max(1);
    if bars.len() < 2 * period {
        return 0.0;
    }
    last_finite(&Adx::new(period).compute(bars)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn adx_bounds() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ]);
        let result = Adx::new(3).compute(&bars);

        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn adx_strong_trend_elevated() {
        let data: Vec<_> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0)
            })
            .collect();
        let bars = make_ohlc_bars(&data);
        let v = adx_latest(&bars, 5);
        assert!(v > 25.0, "ADX should be elevated in strong trend, got {v}");
    }

    #[test]
    fn adx_flat_series_is_zero() {
        let bars = make_ohlc_bars(&vec![(100.0, 100.0, 100.0, 100.0); 120]);
        assert_eq!(adx_latest(&bars, 14), 0.0);
    }

    #[test]
    fn adx_too_few_bars() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0); 27]);
        assert_eq!(adx_latest(&bars, 14), 0.0);
        let single = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0)]);
        assert!(Adx::new(3).compute(&single).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).lookback(), 28);
        assert_eq!(Adx::new(7).lookback(), 14);
    }
}
