//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::{last_finite, Indicator};
use crate::domain::{Bar, EmaBias};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// Compute raw EMA values from a pre-extracted f64 slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// EMA at the newest bar, `None` with fewer than `period` bars.
pub fn ema_latest(bars: &[Bar], period: usize) -> Option<f64> {
    last_finite(&Ema::new(period.max(1)).compute(bars))
}

/// Close versus EMA(`period`) with a fractional dead-band (`0.002` = 0.2%).
///
/// Above `ema * (1 + band)` is BULLISH, below `ema * (1 - band)` is CAUTION,
/// anything in between (or too few bars) is NEUTRAL.
pub fn ema_bias(bars: &[Bar], period: usize, band: f64) -> EmaBias {
    let (Some(ema), Some(last)) = (ema_latest(bars, period), bars.last()) else {
        return EmaBias::Neutral;
    };

    if last.close > ema * (1.0 + band) {
        EmaBias::Bullish
    } else if last.close < ema * (1.0 - band) {
        EmaBias::Caution
    } else {
        EmaBias::Neutral
    }
}
