//! Price zones: swing-cluster reaction zones and structural demand/supply zones.
//!
//! Every zone satisfies `price_low <= price_high`. Zones are recomputed on each
//! call and never persisted by the engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::bar::lenient_timestamp;

/// Anything the level classifier can place above or below the current price.
pub trait PricedLevel {
    /// Price compared against CMP when splitting into supports and resistances.
    fn reference_price(&self) -> f64;
}

impl PricedLevel for f64 {
    fn reference_price(&self) -> f64 {
        *self
    }
}

/// Cluster of swing pivots that price repeatedly reacted at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionZone {
    /// Centroid (mean pivot price).
    pub price: f64,
    pub price_low: f64,
    pub price_high: f64,
    pub touches: usize,
    #[serde(default, with = "lenient_timestamp")]
    pub last_touched: Option<NaiveDateTime>,
    #[serde(default)]
    pub avg_volume: f64,
}

impl ReactionZone {
    /// A single-price zone, used for externally supplied levels.
    pub fn at_price(price: f64) -> Self {
        Self {
            price,
            price_low: price,
            price_high: price,
            touches: 1,
            last_touched: None,
            avg_volume: 0.0,
        }
    }
}

impl PricedLevel for ReactionZone {
    fn reference_price(&self) -> f64 {
        self.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneType {
    Demand,
    Supply,
}

/// Base-then-impulse footprint.
///
/// For DEMAND the proximal edge is `price_high` and the distal edge is
/// `price_low`; SUPPLY is the mirror image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralZone {
    pub price_low: f64,
    pub price_high: f64,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub strength: f64,
    pub creation_index: usize,
    pub touches: usize,
    #[serde(default, with = "lenient_timestamp")]
    pub last_touched: Option<NaiveDateTime>,
}

impl StructuralZone {
    /// Edge price meets first when returning to the zone.
    pub fn proximal(&self) -> f64 {
        match self.zone_type {
            ZoneType::Demand => self.price_high,
            ZoneType::Supply => self.price_low,
        }
    }

    /// Edge whose close-through invalidates the zone.
    pub fn distal(&self) -> f64 {
        match self.zone_type {
            ZoneType::Demand => self.price_low,
            ZoneType::Supply => self.price_high,
        }
    }

    pub fn width(&self) -> f64 {
        self.price_high - self.price_low
    }

    pub fn midpoint(&self) -> f64 {
        (self.price_high + self.price_low) / 2.0
    }
}

impl PricedLevel for StructuralZone {
    fn reference_price(&self) -> f64 {
        self.midpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand() -> StructuralZone {
        StructuralZone {
            price_low: 98.0,
            price_high: 100.0,
            zone_type: ZoneType::Demand,
            strength: 1.0,
            creation_index: 10,
            touches: 1,
            last_touched: None,
        }
    }

    #[test]
    fn demand_edges() {
        let z = demand();
        assert_eq!(z.proximal(), 100.0);
        assert_eq!(z.distal(), 98.0);
        assert_eq!(z.width(), 2.0);
        assert_eq!(z.reference_price(), 99.0);
    }

    #[test]
    fn supply_edges_mirror_demand() {
        let z = StructuralZone {
            zone_type: ZoneType::Supply,
            ..demand()
        };
        assert_eq!(z.proximal(), 98.0);
        assert_eq!(z.distal(), 100.0);
    }

    #[test]
    fn unparsable_last_touched_becomes_none() {
        let json = r#"{"price": 250.0, "price_low": 249.0, "price_high": 251.0,
                       "touches": 2, "last_touched": "not-a-date", "avg_volume": 10.0}"#;
        let zone: ReactionZone = serde_json::from_str(json).unwrap();
        assert_eq!(zone.touches, 2);
        assert!(zone.last_touched.is_none());
    }

    #[test]
    fn last_touched_roundtrips() {
        let mut zone = ReactionZone::at_price(120.0);
        zone.last_touched = crate::domain::parse_timestamp("2024-05-06");
        let json = serde_json::to_string(&zone).unwrap();
        let back: ReactionZone = serde_json::from_str(&json).unwrap();
        assert_eq!(back.last_touched, zone.last_touched);
    }
}
