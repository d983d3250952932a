//! Race design preferences loaded from TOML
//!
//! Races differ in how much of a hull they give over to support modules,
//! which module categories they favor, and how they value each hull size.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::config::{HullTable, WeightBias};
use crate::core::error::Result;
use crate::core::types::HullSize;

/// Smallest multiplier accepted when pricing hull sizes
const MIN_SIZE_COST_MULTIPLIER: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceProfile {
    /// Name of this race (set from filename when loaded)
    #[serde(default)]
    pub name: String,
    /// Base fraction of free space reserved for non-weapon modules
    #[serde(default = "default_module_ratio")]
    pub module_ratio: f32,
    /// Adjustments to the role module weights
    #[serde(default)]
    pub weight_bias: WeightBias,
    /// Relative cost the race assigns to building each hull size
    #[serde(default = "default_size_cost_multiplier")]
    pub size_cost_multiplier: HullTable,
}

fn default_module_ratio() -> f32 {
    0.35
}

fn default_size_cost_multiplier() -> HullTable {
    [1.0; 4]
}

impl Default for RaceProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            module_ratio: default_module_ratio(),
            weight_bias: WeightBias::default(),
            size_cost_multiplier: default_size_cost_multiplier(),
        }
    }
}

impl RaceProfile {
    pub fn size_cost_multiplier(&self, hull: HullSize) -> f32 {
        self.size_cost_multiplier[hull.index()].max(MIN_SIZE_COST_MULTIPLIER)
    }

    pub fn from_toml_str(name: &str, contents: &str) -> Result<Self> {
        let mut race: RaceProfile = toml::from_str(contents)?;
        race.name = name.to_string();
        Ok(race)
    }
}

/// Load a race profile
///
/// Loads from `data/races/{name}.toml`
pub fn load_race(name: &str) -> Result<RaceProfile> {
    let contents = std::fs::read_to_string(race_path(name))?;
    RaceProfile::from_toml_str(name, &contents)
}

fn race_path(name: &str) -> PathBuf {
    PathBuf::from("data/races").join(format!("{}.toml", name))
}
