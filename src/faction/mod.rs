//! Faction - the design-relevant state of one computer-controlled empire

pub mod race;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{ComponentCatalog, ComponentCategory, ComponentKind, SpecialEffect};
use crate::core::config::DesignerConfig;
use crate::core::error::Result;
use crate::core::types::{FactionId, HullSize, ShipRole};
use crate::design::blueprint::Blueprint;
use crate::design::civilian::{fit_colony_ship, fit_scout, ColonyRequirements};
use crate::design::fitter::{fit, FitContext};
use crate::design::slots::DesignSlots;
use crate::rivals::{RivalAssessment, RivalView, TechProfile};

pub use race::{load_race, RaceProfile};

/// Planetary shields are rated this many times the best ship shield
const PLANETARY_SHIELD_FACTOR: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub opinion: i32, // -100 to +100
    pub at_war: bool,
}

impl Relation {
    pub fn is_hostile(&self, config: &DesignerConfig) -> bool {
        self.at_war || self.opinion <= config.hostile_opinion
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub race: RaceProfile,

    // Researched technology
    pub catalog: ComponentCatalog,

    // Diplomatic standing with other factions
    pub relations: AHashMap<FactionId, Relation>,

    // Last known defensive tech of other factions
    pub known_tech: AHashMap<FactionId, TechProfile>,

    pub slots: DesignSlots,
}

impl Faction {
    /// Create a faction with a first design for every role
    pub fn new(
        id: FactionId,
        name: &str,
        race: RaceProfile,
        catalog: ComponentCatalog,
        config: &DesignerConfig,
    ) -> Result<Self> {
        let own = tech_profile_from(id, &catalog);
        let assessment = RivalAssessment::build(&own, &[], config.max_rivals);
        let ctx = FitContext::new(&catalog, &race, config, &assessment);

        let initial: Vec<Blueprint> = ShipRole::REVIEW_ORDER
            .iter()
            .map(|&role| match role {
                ShipRole::Scout => fit_scout(&catalog),
                ShipRole::Colony => fit_colony_ship(&ctx, ColonyRequirements::default()),
                ShipRole::Fighter | ShipRole::Bomber | ShipRole::Destroyer => fit(&ctx, role, HullSize::Small),
            })
            .collect();
        let slots = DesignSlots::new(config.design_slots, &display_name(&race.name), initial)?;

        Ok(Self {
            id,
            name: name.to_string(),
            race,
            catalog,
            relations: AHashMap::new(),
            known_tech: AHashMap::new(),
            slots,
        })
    }

    /// Defensive tech this faction fields
    pub fn tech(&self) -> TechProfile {
        tech_profile_from(self.id, &self.catalog)
    }

    pub fn set_relation(&mut self, other: FactionId, relation: Relation) {
        self.relations.insert(other, relation);
    }

    pub fn learn_tech(&mut self, profile: TechProfile) {
        if profile.faction != self.id {
            self.known_tech.insert(profile.faction, profile);
        }
    }

    pub fn at_war(&self) -> bool {
        self.relations.values().any(|r| r.at_war)
    }

    pub fn hostile_count(&self, config: &DesignerConfig) -> u32 {
        self.relations.values().filter(|r| r.is_hostile(config)).count() as u32
    }

    /// Everything known about each other faction; unknown tech counts as bare
    pub fn rival_views(&self) -> Vec<RivalView> {
        self.relations
            .iter()
            .filter(|(other, _)| **other != self.id)
            .map(|(&other, relation)| RivalView {
                faction: other,
                relation: relation.opinion,
                tech: self.known_tech.get(&other).copied().unwrap_or_else(|| TechProfile::bare(other)),
            })
            .collect()
    }

    pub fn assessment(&self, config: &DesignerConfig) -> RivalAssessment {
        RivalAssessment::build(&self.tech(), &self.rival_views(), config.max_rivals)
    }

    pub fn current_design(&self, role: ShipRole) -> Option<&Blueprint> {
        self.slots.current(role)
    }
}

/// Derive defensive tech from a catalog
pub fn tech_profile_from(faction: FactionId, catalog: &ComponentCatalog) -> TechProfile {
    let shield = catalog
        .components_of(ComponentCategory::Shield)
        .iter()
        .filter_map(|c| match c.kind {
            ComponentKind::Shield { absorb } => Some(absorb),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    let carries = |effect: SpecialEffect| !catalog.specials_where(|e| e.same_kind(&effect)).is_empty();

    TechProfile {
        faction,
        shield,
        planetary_shield: shield * PLANETARY_SHIELD_FACTOR,
        interdictor: carries(SpecialEffect::Interdictor),
        repulsor: carries(SpecialEffect::Repulsor),
    }
}

/// "human" -> "Human"
fn display_name(race: &str) -> String {
    let mut chars = race.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
