//! Support/resistance split relative to the current market price.

use crate::domain::{Classified, PricedLevel};

/// Split `zones` around `cmp`.
///
/// Supports lie strictly below CMP ordered nearest-first (descending price),
/// resistances strictly above ordered nearest-first (ascending). A zone whose
/// reference price equals CMP belongs to neither side. Each side keeps at most
/// `cap` entries.
pub fn classify<Z>(zones: &[Z], cmp: f64, cap: usize) -> Classified<Z>
where
    Z: PricedLevel + Clone,
{
    let mut supports: Vec<Z> = zones
        .iter()
        .filter(|z| z.reference_price() < cmp)
        .cloned()
        .collect();
    let mut resistances: Vec<Z> = zones
        .iter()
        .filter(|z| z.reference_price() > cmp)
        .cloned()
        .collect();

    supports.sort_by(|a, b| b.reference_price().total_cmp(&a.reference_price()));
    resistances.sort_by(|a, b| a.reference_price().total_cmp(&b.reference_price()));
    supports.truncate(cap);
    resistances.truncate(cap);

    Classified {
        supports,
        resistances,
    }
}

/// Highest support price, if any.
pub fn nearest_support<Z: PricedLevel>(supports: &[Z]) -> Option<f64> {
    supports.first().map(PricedLevel::reference_price)
}

/// Lowest resistance price, if any.
pub fn nearest_resistance<Z: PricedLevel>(resistances: &[Z]) -> Option<f64> {
    resistances.first().map(PricedLevel::reference_price)
}
