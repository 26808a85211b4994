//! Relative Strength Index (RSI).
//!
//! Simple averages of the last `period` gains and losses:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period. A zero average loss has no defined ratio and yields 50.

use super::{last_finite, Indicator};
use crate::domain::Bar;

/// Neutral RSI used whenever the value is undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        let changes: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();

        for i in self.period..n {
            // changes[k] is the move into bar k + 1
            let window = &changes[i - self.period..i];
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }
            let gain: f64 = window.iter().filter(|c| **c > 0.0).sum();
            let loss: f64 = window.iter().filter(|c| **c < 0.0).map(|c| -c).sum();
            result[i] = compute_rsi(gain / self.period as f64, loss / self.period as f64);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        NEUTRAL_RSI
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// RSI at the newest bar, 50.0 when there is not enough data.
pub fn rsi_latest(bars: &[Bar], period: usize) -> f64 {
    last_finite(&Rsi::new(period.max(1)).compute(bars)).unwrap_or(NEUTRAL_RSI)
}
