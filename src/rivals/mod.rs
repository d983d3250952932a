//! Rival assessment - synthetic worst-case opponents for damage scoring
//!
//! A faction designs against the rivals it gets along with worst. Each rival
//! is reduced to the handful of defensive traits that change how much damage
//! a weapon does: ship shields, planetary shields, and whether the rival
//! fields repulsors or missile interdictors. If fewer rivals are known than
//! the assessment wants, the faction's own tech stands in for the rest.

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// Defensive tech a faction is believed to field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechProfile {
    pub faction: FactionId,
    /// Best ship shield level
    pub shield: u32,
    /// Best planetary shield level
    pub planetary_shield: u32,
    pub interdictor: bool,
    pub repulsor: bool,
}

impl TechProfile {
    /// A faction with no defensive tech at all
    pub fn bare(faction: FactionId) -> Self {
        Self {
            faction,
            shield: 0,
            planetary_shield: 0,
            interdictor: false,
            repulsor: false,
        }
    }
}

/// What a faction knows about one rival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalView {
    pub faction: FactionId,
    /// Diplomatic relation, -100 (hatred) to +100 (friendship)
    pub relation: i32,
    pub tech: TechProfile,
}

/// Ship-combat target built from a rival profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipTarget {
    pub shield: u32,
    pub interdictor: bool,
    pub repulsor: bool,
}

/// Bombardment target built from a rival profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyTarget {
    pub shield: u32,
}

/// Target sets for one evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RivalAssessment {
    pub ship_targets: Vec<ShipTarget>,
    pub colony_targets: Vec<ColonyTarget>,
}

impl RivalAssessment {
    /// Assess the worst `max_count` rivals and build both target sets
    pub fn build(own: &TechProfile, views: &[RivalView], max_count: usize) -> Self {
        let profiles = assess_rivals(own, views, max_count);
        Self {
            ship_targets: build_ship_targets(&profiles),
            colony_targets: build_colony_targets(&profiles),
        }
    }
}

/// Pick the tech profiles of the worst-relation rivals, worst first.
///
/// Ties in relation are broken by faction id. When fewer than `max_count`
/// rivals are known the list is padded with `own`.
pub fn assess_rivals(own: &TechProfile, views: &[RivalView], max_count: usize) -> Vec<TechProfile> {
    let mut ranked: Vec<&RivalView> = views.iter().filter(|v| v.faction != own.faction).collect();
    ranked.sort_by_key(|v| (v.relation, v.faction));

    let mut profiles: Vec<TechProfile> = ranked.into_iter().take(max_count).map(|v| v.tech).collect();
    while profiles.len() < max_count {
        profiles.push(*own);
    }
    profiles
}

pub fn build_ship_targets(profiles: &[TechProfile]) -> Vec<ShipTarget> {
    profiles
        .iter()
        .map(|p| ShipTarget {
            shield: p.shield,
            interdictor: p.interdictor,
            repulsor: p.repulsor,
        })
        .collect()
}

pub fn build_colony_targets(profiles: &[TechProfile]) -> Vec<ColonyTarget> {
    profiles
        .iter()
        .map(|p| ColonyTarget { shield: p.planetary_shield })
        .collect()
}
