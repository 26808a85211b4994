//! Swing/pivot detection with a symmetric window.

use crate::domain::{Bar, SwingKind, SwingPoint, Swings};

/// Find swing highs and lows.
///
/// Bar `i` in `[window, n - window)` is a swing high iff its high is strictly
/// greater than the high of every bar within `window` on both sides; swing
/// lows mirror this on the low. Ties never qualify. An outside bar that passes
/// both tests is ambiguous and reported as neither, so no index ever appears
/// in both lists.
pub fn detect_swings(bars: &[Bar], window: usize) -> Swings {
    let mut swings = Swings::default();
    let n = bars.len();
    let window = window.max(1);

    if n < 2 * window + 1 {
        return swings;
    }

    for i in window..n - window {
        let neighbours = (1..=window).flat_map(|j| [&bars[i - j], &bars[i + j]]);
        let (mut is_high, mut is_low) = (true, true);
        for other in neighbours {
            is_high &= bars[i].high > other.high;
            is_low &= bars[i].low < other.low;
        }

        let kind = match (is_high, is_low) {
            (true, false) => SwingKind::High,
            (false, true) => SwingKind::Low,
            _ => continue,
        };

        let bar = &bars[i];
        let point = SwingPoint {
            index: i,
            price: match kind {
                SwingKind::High => bar.high,
                SwingKind::Low => bar.low,
            },
            timestamp: bar.timestamp,
            volume: bar.volume,
            kind,
        };
        match kind {
            SwingKind::High => swings.highs.push(point),
            SwingKind::Low => swings.lows.push(point),
        }
    }

    swings
}
