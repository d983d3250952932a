//! Seeded multi-faction campaign driving the design engine
//!
//! Factions research, drift in and out of war, build ships of their current
//! designs and review those designs every turn. The campaign exists to
//! exercise the engine end to end; economy and diplomacy are deliberately
//! crude random walks.

pub mod output;

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::info;

use crate::catalog::ComponentCatalog;
use crate::core::config::DesignerConfig;
use crate::core::error::Result;
use crate::core::types::{DesignId, FactionId, ShipRole};
use crate::design::civilian::ColonyRequirements;
use crate::faction::{load_race, Faction, RaceProfile, Relation};
use crate::turn::{review_faction_designs_with, TurnInputs, TurnReport};

pub use output::{CampaignOutput, CampaignStats, DesignSummary, FactionSummary};

/// Highest tech level in the standard tree
const MAX_TECH_LEVEL: u32 = 8;

/// Opinion at or below which relations break into war
const WAR_OPINION: i32 = -60;

/// Opinion at or above which a war ends
const PEACE_OPINION: i32 = -20;

#[derive(Clone, Debug)]
pub struct CampaignConfig {
    pub factions: u32,
    pub turns: u32,
    pub seed: u64,
    /// Race profiles, cycled over the factions (loaded from data/races/)
    pub races: Vec<String>,
    pub starting_tech: u32,
    /// Chance per turn that a faction reaches the next tech level
    pub research_chance: f64,
    pub starting_production: f32,
    /// Per-turn production growth factor
    pub production_growth: f32,
    /// Turns between changes to colony ship requirements
    pub colony_review_interval: u32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            factions: 4,
            turns: 100,
            seed: 12345,
            races: vec![
                "human".to_string(),
                "saurian".to_string(),
                "insectoid".to_string(),
                "psionic".to_string(),
            ],
            starting_tech: 1,
            research_chance: 0.08,
            starting_production: 60.0,
            production_growth: 1.02,
            colony_review_interval: 25,
        }
    }
}

/// One faction plus the crude economy around it
struct Empire {
    faction: Faction,
    tech_level: u32,
    production: f32,
    fleet: AHashMap<DesignId, u32>,
    colony_requirements: ColonyRequirements,
}

impl Empire {
    /// Spend this turn's production on ships of the current designs
    fn build_ships(&mut self) {
        let mut budget = self.production;
        for role in ShipRole::REVIEW_ORDER {
            let Some(design) = self.faction.current_design(role) else { continue };
            let cost = design.cost();
            if cost <= 0.0 || budget < cost {
                continue;
            }
            let share = if role.is_combat() { 0.25 } else { 0.1 };
            let units = ((self.production * share) / cost).floor().min(budget / cost).max(0.0) as u32;
            *self.fleet.entry(design.id).or_insert(0) += units;
            budget -= units as f32 * cost;
        }
    }

    /// Scrap ships whose design has left every slot
    fn scrap_retired(&mut self) {
        let slots = &self.faction.slots;
        self.fleet.retain(|id, _| slots.find(*id).is_some());
    }
}

/// Run a seeded campaign over the given full technology tree
pub fn run_campaign(
    config: &CampaignConfig,
    tree: &ComponentCatalog,
    designer: &DesignerConfig,
) -> Result<CampaignOutput> {
    let start = std::time::Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let races: Vec<RaceProfile> = config
        .races
        .iter()
        .map(|name| load_race(name))
        .collect::<Result<_>>()?;

    let mut empires = Vec::with_capacity(config.factions as usize);
    for i in 0..config.factions {
        let race = races.get(i as usize % races.len().max(1)).cloned().unwrap_or_default();
        let name = format!("Dominion {} ({})", i + 1, race.name);
        let faction = Faction::new(
            FactionId(i + 1),
            &name,
            race,
            tree.up_to_level(config.starting_tech),
            designer,
        )?;
        empires.push(Empire {
            faction,
            tech_level: config.starting_tech,
            production: config.starting_production,
            fleet: AHashMap::new(),
            colony_requirements: ColonyRequirements::default(),
        });
    }
    initialize_relations(&mut empires, &mut rng);

    let mut history: Vec<TurnReport> = Vec::new();
    for turn in 0..config.turns {
        advance_research(&mut empires, tree, config, &mut rng);
        share_intel(&mut empires);
        drift_relations(&mut empires, &mut rng);

        let inputs: Vec<TurnInputs> = empires
            .iter_mut()
            .map(|e| turn_inputs(e, turn, config, &mut rng))
            .collect();

        // Factions share nothing mutable during review
        let reports = empires
            .par_iter_mut()
            .zip(inputs.par_iter())
            .map(|(empire, input)| review_faction_designs_with(&mut empire.faction, input, designer))
            .collect::<Result<Vec<_>>>()?;

        for empire in empires.iter_mut() {
            empire.scrap_retired();
            empire.build_ships();
            empire.production *= config.production_growth;
        }

        history.extend(reports.into_iter().filter(|r| r.events().next().is_some()));
    }

    let factions: Vec<FactionSummary> = empires
        .iter()
        .map(|e| FactionSummary::new(&e.faction, e.tech_level))
        .collect();
    let output = CampaignOutput::new(factions, history, config.turns, start.elapsed());
    info!("{}", output.summary());
    Ok(output)
}

fn initialize_relations(empires: &mut [Empire], rng: &mut ChaCha8Rng) {
    let ids: Vec<FactionId> = empires.iter().map(|e| e.faction.id).collect();
    for a in 0..empires.len() {
        for b in (a + 1)..empires.len() {
            let opinion = rng.gen_range(-100..=100);
            let relation = Relation {
                opinion,
                at_war: opinion <= WAR_OPINION,
            };
            empires[a].faction.set_relation(ids[b], relation);
            empires[b].faction.set_relation(ids[a], relation);
        }
    }
}

fn drift_relations(empires: &mut [Empire], rng: &mut ChaCha8Rng) {
    for a in 0..empires.len() {
        for b in (a + 1)..empires.len() {
            let other = empires[b].faction.id;
            let Some(mut relation) = empires[a].faction.relations.get(&other).copied() else { continue };
            relation.opinion = (relation.opinion + rng.gen_range(-6..=6)).clamp(-100, 100);
            if relation.opinion <= WAR_OPINION {
                relation.at_war = true;
            } else if relation.opinion >= PEACE_OPINION {
                relation.at_war = false;
            }
            let id = empires[a].faction.id;
            empires[a].faction.set_relation(other, relation);
            empires[b].faction.set_relation(id, relation);
        }
    }
}

fn advance_research(empires: &mut [Empire], tree: &ComponentCatalog, config: &CampaignConfig, rng: &mut ChaCha8Rng) {
    for empire in empires.iter_mut() {
        if empire.tech_level < MAX_TECH_LEVEL && rng.gen_bool(config.research_chance) {
            empire.tech_level += 1;
            empire.faction.catalog = tree.up_to_level(empire.tech_level);
        }
    }
}

/// Every faction sees every other faction's current defensive tech
fn share_intel(empires: &mut [Empire]) {
    let profiles: Vec<_> = empires.iter().map(|e| e.faction.tech()).collect();
    for empire in empires.iter_mut() {
        for profile in &profiles {
            empire.faction.learn_tech(*profile);
        }
    }
}

fn turn_inputs(empire: &mut Empire, turn: u32, config: &CampaignConfig, rng: &mut ChaCha8Rng) -> TurnInputs {
    if config.colony_review_interval > 0 && turn > 0 && turn % config.colony_review_interval == 0 {
        empire.colony_requirements = ColonyRequirements {
            armed: rng.gen_bool(0.3),
            min_range: rng.gen_range(0..=6),
        };
    }

    // A few colony ships are always somewhere between stars
    let mut in_transit = AHashMap::new();
    if let Some(colony) = empire.faction.current_design(ShipRole::Colony) {
        in_transit.insert(colony.id, rng.gen_range(0..=1));
    }

    TurnInputs {
        turn,
        production_budget: empire.production * rng.gen_range(0.8f32..1.2),
        turn_production: empire.production,
        in_service: empire.fleet.clone(),
        in_transit,
        colony_requirements: empire.colony_requirements,
    }
}
