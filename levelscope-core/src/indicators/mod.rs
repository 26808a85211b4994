//! Technical feature library.
//!
//! Every indicator is a pure function of the bar window: bars in, a series of
//! the same length out, with `f64::NAN` during warmup. Scalar helpers
//! (`*_latest`, `volume_ratio`, `structure_bias`) read the newest value and fall
//! back to a documented neutral default when the window is too short.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod rsi;
pub mod structure;
pub mod volume;

pub use adx::{adx_latest, Adx};
pub use atr::{atr_latest, true_range, Atr};
pub use ema::{ema_bias, ema_latest, Ema};
pub use rsi::{rsi_latest, Rsi};
pub use structure::structure_bias;
pub use volume::{average_volume, volume_ratio};

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warmup).
/// No value at bar t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "atr_14", "ema_50").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// Newest value, or `None` while still warming up.
    fn latest(&self, bars: &[Bar]) -> Option<f64> {
        last_finite(&self.compute(bars))
    }
}

/// Last element of a series if it is a real number.
pub fn last_finite(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_bars(&data)
}

/// Daily bars from `(open, high, low, close)` tuples, volume 1000.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
