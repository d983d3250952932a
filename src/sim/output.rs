//! Campaign output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{DesignId, FactionId, HullSize, ShipRole};
use crate::faction::Faction;
use crate::turn::{DesignEvent, TurnReport};

/// Complete campaign output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignOutput {
    pub factions: Vec<FactionSummary>,
    pub history: Vec<TurnReport>,
    pub statistics: CampaignStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactionSummary {
    pub id: FactionId,
    pub name: String,
    pub race: String,
    pub tech_level: u32,
    pub at_war: bool,
    pub designs: Vec<DesignSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DesignSummary {
    pub id: DesignId,
    pub role: ShipRole,
    pub name: String,
    pub hull: HullSize,
    pub cost: f32,
    pub warp: u32,
    pub ship_damage: f32,
    pub colony_damage: f32,
    pub free_space: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignStats {
    pub turns_simulated: u32,
    pub simulation_time_ms: u64,
    pub designs_obsoleted: u32,
    pub designs_installed: u32,
    pub designs_retired: u32,
}

impl FactionSummary {
    pub fn new(faction: &Faction, tech_level: u32) -> Self {
        let designs = ShipRole::REVIEW_ORDER
            .iter()
            .filter_map(|&role| faction.current_design(role))
            .map(|bp| DesignSummary {
                id: bp.id,
                role: bp.role,
                name: bp.name.clone(),
                hull: bp.hull,
                cost: bp.cost(),
                warp: bp.warp(),
                ship_damage: bp.ship_damage,
                colony_damage: bp.colony_damage,
                free_space: bp.free_space(),
            })
            .collect();

        Self {
            id: faction.id,
            name: faction.name.clone(),
            race: faction.race.name.clone(),
            tech_level,
            at_war: faction.at_war(),
            designs,
        }
    }
}

impl CampaignOutput {
    pub fn new(factions: Vec<FactionSummary>, history: Vec<TurnReport>, turns: u32, elapsed: Duration) -> Self {
        let count = |pred: fn(&DesignEvent) -> bool| {
            history.iter().flat_map(|r| r.events()).filter(|e| pred(e)).count() as u32
        };
        let designs_obsoleted = count(|e| matches!(e, DesignEvent::Obsoleted { .. }));
        let designs_installed = count(|e| matches!(e, DesignEvent::Installed { .. }));
        let designs_retired = count(|e| matches!(e, DesignEvent::Retired { .. }));

        Self {
            factions,
            history,
            statistics: CampaignStats {
                turns_simulated: turns,
                simulation_time_ms: elapsed.as_millis() as u64,
                designs_obsoleted,
                designs_installed,
                designs_retired,
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} turns in {}ms\n{} factions, {} designs installed, {} obsoleted, {} retired",
            self.statistics.turns_simulated,
            self.statistics.simulation_time_ms,
            self.factions.len(),
            self.statistics.designs_installed,
            self.statistics.designs_obsoleted,
            self.statistics.designs_retired,
        )
    }
}
