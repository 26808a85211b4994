//! Volume features.

use crate::domain::Bar;

/// Current volume relative to its rolling `period`-bar average.
///
/// Trailing zero-volume bars (after-hours prints) are skipped: the "current"
/// bar is the newest bar with non-zero volume and the average window ends
/// there. Returns 1.0 when there is no usable baseline.
pub fn volume_ratio(bars: &[Bar], period: usize) -> f64 {
    let Some(last) = bars.iter().rposition(|b| b.volume > 0) else {
        return 1.0;
    };
    let start = (last + 1).saturating_sub(period.max(1));
    let window = &bars[start..=last];

    let avg = window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64;
    if avg > 0.0 {
        bars[last].volume as f64 / avg
    } else {
        1.0
    }
}

/// Mean volume of the newest `period` bars (all bars if fewer), 0.0 when empty.
pub fn average_volume(bars: &[Bar], period: usize) -> f64 {
    let start = bars.len().saturating_sub(period.max(1));
    let window = &bars[start..];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn with_volumes(volumes: &[u64]) -> Vec<Bar> {
        let mut bars = make_bars(&vec![100.0; volumes.len()]);
        for (bar, &v) in bars.iter_mut().zip(volumes) {
            bar.volume = v;
        }
        bars
    }

    #[test]
    fn ratio_against_rolling_mean() {
        // window of 4: 100, 100, 100, 300 → mean 150, ratio 2
        let bars = with_volumes(&[500, 100, 100, 100, 300]);
        assert_approx(volume_ratio(&bars, 4), 2.0, 1e-12);
    }

    #[test]
    fn ratio_skips_trailing_zero_bars() {
        let bars = with_volumes(&[100, 100, 100, 300, 0, 0]);
        assert_approx(volume_ratio(&bars, 4), 2.0, 1e-12);
    }

    #[test]
    fn ratio_defaults_to_one() {
        assert_eq!(volume_ratio(&[], 20), 1.0);
        assert_eq!(volume_ratio(&with_volumes(&[0, 0, 0]), 20), 1.0);
    }

    #[test]
    fn average_of_tail() {
        let bars = with_volumes(&[1_000, 200, 400]);
        assert_approx(average_volume(&bars, 2), 300.0, 1e-12);
        assert_approx(average_volume(&bars, 20), 1_600.0 / 3.0, 1e-9);
        assert_eq!(average_volume(&[], 20), 0.0);
    }
}
