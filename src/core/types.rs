//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

impl FactionId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for a catalog component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

/// Unique identifier for a blueprint, assigned by the owning faction's slot pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(pub u32);

/// Game turn counter
pub type Turn = u32;

/// Integral hull space units
pub type Space = u32;

/// Hull size class - one of four discrete capacity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HullSize {
    Small = 0,
    Medium = 1,
    Large = 2,
    Huge = 3,
}

impl HullSize {
    /// All hull sizes, smallest first
    pub const ALL: [HullSize; 4] = [HullSize::Small, HullSize::Medium, HullSize::Large, HullSize::Huge];

    /// Total space available on the hull
    pub fn capacity(&self) -> Space {
        match self {
            HullSize::Small => 40,
            HullSize::Medium => 200,
            HullSize::Large => 1000,
            HullSize::Huge => 5000,
        }
    }

    /// Multiplier applied to hull-scaled component space and cost
    pub fn scale(&self) -> u32 {
        match self {
            HullSize::Small => 1,
            HullSize::Medium => 5,
            HullSize::Large => 25,
            HullSize::Huge => 125,
        }
    }

    /// Cost of the bare hull
    pub fn base_cost(&self) -> f32 {
        match self {
            HullSize::Small => 6.0,
            HullSize::Medium => 20.0,
            HullSize::Large => 60.0,
            HullSize::Huge => 200.0,
        }
    }

    /// Structural hit points before armor
    pub fn base_hits(&self) -> f32 {
        match self {
            HullSize::Small => 3.0,
            HullSize::Medium => 18.0,
            HullSize::Large => 100.0,
            HullSize::Huge => 600.0,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            HullSize::Small => "Small",
            HullSize::Medium => "Medium",
            HullSize::Large => "Large",
            HullSize::Huge => "Huge",
        }
    }
}

/// Combat role a design is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipRole {
    Scout,
    Colony,
    Fighter,
    Bomber,
    Destroyer,
}

impl ShipRole {
    /// Order in which roles are reviewed each turn.
    ///
    /// Slot availability checks for later roles observe the changes made by
    /// earlier ones.
    pub const REVIEW_ORDER: [ShipRole; 5] = [
        ShipRole::Fighter,
        ShipRole::Destroyer,
        ShipRole::Bomber,
        ShipRole::Scout,
        ShipRole::Colony,
    ];

    /// Fighter, bomber and destroyer designs go through the full fitter
    pub fn is_combat(&self) -> bool {
        matches!(self, ShipRole::Fighter | ShipRole::Bomber | ShipRole::Destroyer)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShipRole::Scout => "Scout",
            ShipRole::Colony => "Colony",
            ShipRole::Fighter => "Fighter",
            ShipRole::Bomber => "Bomber",
            ShipRole::Destroyer => "Destroyer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_capacity_grows_with_size() {
        for pair in HullSize::ALL.windows(2) {
            assert!(pair[0].capacity() < pair[1].capacity());
            assert!(pair[0].scale() < pair[1].scale());
        }
    }

    #[test]
    fn test_hull_scale_tracks_capacity() {
        for hull in HullSize::ALL {
            assert_eq!(hull.capacity(), HullSize::Small.capacity() * hull.scale());
        }
    }

    #[test]
    fn test_review_order_covers_every_role() {
        let mut roles = ShipRole::REVIEW_ORDER.to_vec();
        roles.sort();
        roles.dedup();
        assert_eq!(roles.len(), 5);
        assert_eq!(ShipRole::REVIEW_ORDER[0], ShipRole::Fighter);
        assert_eq!(ShipRole::REVIEW_ORDER[4], ShipRole::Colony);
    }

    #[test]
    fn test_combat_roles() {
        assert!(ShipRole::Fighter.is_combat());
        assert!(ShipRole::Destroyer.is_combat());
        assert!(!ShipRole::Scout.is_combat());
        assert!(!ShipRole::Colony.is_combat());
    }
}
