//! Zone builders.
//!
//! Two independent strategies share the feature library: swing-cluster
//! reaction zones and structural base → impulse demand/supply zones.

pub mod cluster;
pub mod structural;

pub use cluster::cluster_swings;
pub use structural::{apply_lifecycle, detect_structural_zones, find_candidates, merge_zones};
