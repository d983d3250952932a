//! Designer configuration with documented constants
//!
//! All tuning numbers for fitting, selection and obsolescence are collected
//! here. Role-dependent ratios and weights are kept as data tables indexed by
//! role and hull size rather than spread across branches.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DesignError, Result};
use crate::core::types::{HullSize, ShipRole};

/// Integer weights used to split module space across non-weapon categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub computer: u32,
    pub shield: u32,
    pub ecm: u32,
    pub maneuver: u32,
    pub special: u32,
}

impl CategoryWeights {
    pub fn total(&self) -> u32 {
        self.computer + self.shield + self.ecm + self.maneuver + self.special
    }

    /// Add a (possibly negative) bias, never dropping a weight below zero
    pub fn biased(&self, bias: &WeightBias) -> Self {
        let apply = |w: u32, b: i32| (w as i64 + b as i64).max(0) as u32;
        Self {
            computer: apply(self.computer, bias.computer),
            shield: apply(self.shield, bias.shield),
            ecm: apply(self.ecm, bias.ecm),
            maneuver: apply(self.maneuver, bias.maneuver),
            special: apply(self.special, bias.special),
        }
    }
}

/// Race preference adjustments to the role weight tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightBias {
    pub computer: i32,
    pub shield: i32,
    pub ecm: i32,
    pub maneuver: i32,
    pub special: i32,
}

/// Per-hull values, indexed by `HullSize::index()`
pub type HullTable = [f32; 4];

/// Configuration for the design engine
///
/// These values have been tuned so that designs refresh every few dozen turns
/// of steady research. Changing them affects how often factions churn slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    // === SLOTS ===
    /// Number of design slots per faction
    ///
    /// Must be at least the number of roles, since every role always has a
    /// current design. The spare slots are what make overlapping replacement
    /// possible.
    pub design_slots: usize,

    // === RIVAL ASSESSMENT ===
    /// How many worst-relation rivals are modeled as targets
    pub max_rivals: usize,

    /// Opinion at or below which a relation counts as hostile even without war
    pub hostile_opinion: i32,

    // === FITTING ===
    /// Hull adjustment applied to the race module ratio
    ///
    /// Larger hulls reserve a larger fraction for non-weapon modules.
    pub module_ratio_by_hull: HullTable,

    /// Upper bound for the adjusted module ratio
    pub max_module_ratio: f32,

    /// Fraction of the remaining space handed to weapon passes
    ///
    /// What the weapons leave behind feeds the second module pass.
    pub weapon_fraction_by_hull: HullTable,

    /// Share of weapon space reserved for bombardment, bombers
    pub bomber_bombard_share: HullTable,

    /// Share of weapon space reserved for bombardment, destroyers
    pub destroyer_bombard_share: HullTable,

    /// Share of anti-ship weapon space the primary pass may use when a
    /// secondary pass still has a slot to fill
    pub primary_pass_share: f32,

    /// Per-step decay used when trading weapons for a range special
    ///
    /// A range special adding `r` is accepted only if the remaining count is
    /// at least `ceil(count * range_decay^r)`.
    pub range_decay: f32,

    /// Module weights per combat role
    pub fighter_weights: CategoryWeights,
    pub bomber_weights: CategoryWeights,
    pub destroyer_weights: CategoryWeights,

    // === SELECTION ===
    /// Production budget multiplier for the affordability count
    pub affordability_window: f32,

    /// Cost inflation applied to the active design when comparing candidates
    ///
    /// Keeps the already-built design from winning merely because it is
    /// already in the slot.
    pub active_cost_inflation: f32,

    // === OBSOLESCENCE ===
    /// Free-space fraction below which a design on the fastest engine is
    /// considered packed and not re-evaluated
    pub packed_free_fraction: f32,

    /// Improvement required to replace a design at peace
    pub peace_upgrade_threshold: f32,

    /// Improvement required to replace a design while at war
    pub war_upgrade_threshold: f32,

    /// Floor for damage-per-cost denominators
    pub min_damage_per_cost: f32,

    /// Turns an obsolete design keeps flying, per role
    pub scout_countdown: u32,
    pub colony_countdown: u32,
    pub fighter_countdown: u32,
    pub bomber_countdown: u32,
    pub destroyer_countdown: u32,

    /// Committed value, in turns of total production, below which an obsolete
    /// design is cheap enough to retire at once
    pub light_retire_fraction: f32,
    pub destroyer_retire_fraction: f32,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            design_slots: 6,
            max_rivals: 3,
            hostile_opinion: -50,

            module_ratio_by_hull: [0.8, 1.0, 1.1, 1.2],
            max_module_ratio: 0.9,
            weapon_fraction_by_hull: [1.0, 0.9, 0.85, 0.8],
            bomber_bombard_share: [0.8, 0.6, 0.5, 0.4],
            destroyer_bombard_share: [0.0, 0.0, 0.1, 0.1],
            primary_pass_share: 0.7,
            range_decay: 0.95,

            fighter_weights: CategoryWeights { computer: 3, shield: 3, ecm: 1, maneuver: 3, special: 2 },
            bomber_weights: CategoryWeights { computer: 1, shield: 4, ecm: 3, maneuver: 2, special: 1 },
            destroyer_weights: CategoryWeights { computer: 3, shield: 3, ecm: 2, maneuver: 2, special: 2 },

            affordability_window: 3.0,
            active_cost_inflation: 100.0,

            packed_free_fraction: 0.15,
            peace_upgrade_threshold: 1.25,
            war_upgrade_threshold: 1.5,
            min_damage_per_cost: 0.001,

            scout_countdown: 1,
            colony_countdown: 8,
            fighter_countdown: 8,
            bomber_countdown: 9,
            destroyer_countdown: 10,

            light_retire_fraction: 0.5,
            destroyer_retire_fraction: 1.0,
        }
    }
}

impl DesignerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DesignerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.design_slots < ShipRole::REVIEW_ORDER.len() {
            return Err(DesignError::SlotPoolTooSmall {
                capacity: self.design_slots,
                required: ShipRole::REVIEW_ORDER.len(),
            });
        }

        if self.max_rivals == 0 {
            return Err(DesignError::InvalidConfig("max_rivals must be at least 1".into()));
        }

        if self.war_upgrade_threshold < self.peace_upgrade_threshold {
            return Err(DesignError::InvalidConfig(format!(
                "war_upgrade_threshold ({}) should be >= peace_upgrade_threshold ({})",
                self.war_upgrade_threshold, self.peace_upgrade_threshold
            )));
        }

        let scalars = [self.primary_pass_share, self.packed_free_fraction, self.max_module_ratio];
        let fractions = self
            .weapon_fraction_by_hull
            .iter()
            .chain(self.bomber_bombard_share.iter())
            .chain(self.destroyer_bombard_share.iter())
            .chain(scalars.iter());
        for &f in fractions {
            if !(0.0..=1.0).contains(&f) {
                return Err(DesignError::InvalidConfig(format!("fraction {} outside [0, 1]", f)));
            }
        }

        if self.range_decay <= 0.0 || self.range_decay > 1.0 {
            return Err(DesignError::InvalidConfig("range_decay must be in (0, 1]".into()));
        }

        if self.affordability_window <= 0.0 || self.active_cost_inflation < 1.0 {
            return Err(DesignError::InvalidConfig(
                "affordability_window must be positive and active_cost_inflation >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Module weights for a combat role; civilian roles carry none
    pub fn role_weights(&self, role: ShipRole) -> CategoryWeights {
        match role {
            ShipRole::Fighter => self.fighter_weights,
            ShipRole::Bomber => self.bomber_weights,
            ShipRole::Destroyer => self.destroyer_weights,
            ShipRole::Scout | ShipRole::Colony => CategoryWeights::default(),
        }
    }

    /// Share of weapon space reserved for bombardment
    pub fn bombard_share(&self, role: ShipRole, hull: HullSize) -> f32 {
        match role {
            ShipRole::Bomber => self.bomber_bombard_share[hull.index()],
            ShipRole::Destroyer => self.destroyer_bombard_share[hull.index()],
            ShipRole::Fighter | ShipRole::Scout | ShipRole::Colony => 0.0,
        }
    }

    pub fn weapon_fraction(&self, hull: HullSize) -> f32 {
        self.weapon_fraction_by_hull[hull.index()]
    }

    /// Race module ratio adjusted for hull size and clamped
    pub fn module_ratio(&self, race_ratio: f32, hull: HullSize) -> f32 {
        (race_ratio * self.module_ratio_by_hull[hull.index()]).clamp(0.0, self.max_module_ratio)
    }

    /// Turns an obsolete design of this role may keep flying
    pub fn countdown(&self, role: ShipRole) -> u32 {
        match role {
            ShipRole::Scout => self.scout_countdown,
            ShipRole::Colony => self.colony_countdown,
            ShipRole::Fighter => self.fighter_countdown,
            ShipRole::Bomber => self.bomber_countdown,
            ShipRole::Destroyer => self.destroyer_countdown,
        }
    }

    /// Fraction of one turn's production below which committed value is
    /// small enough to retire an obsolete design outright
    pub fn retire_fraction(&self, role: ShipRole) -> f32 {
        match role {
            ShipRole::Destroyer => self.destroyer_retire_fraction,
            ShipRole::Fighter | ShipRole::Bomber | ShipRole::Scout | ShipRole::Colony => {
                self.light_retire_fraction
            }
        }
    }

    pub fn upgrade_threshold(&self, at_war: bool) -> f32 {
        if at_war {
            self.war_upgrade_threshold
        } else {
            self.peace_upgrade_threshold
        }
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<DesignerConfig> = OnceLock::new();

/// Get the global designer config (initializes with defaults if not set)
pub fn config() -> &'static DesignerConfig {
    CONFIG.get_or_init(DesignerConfig::default)
}

/// Set the global designer config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: DesignerConfig) -> std::result::Result<(), DesignerConfig> {
    CONFIG.set(config)
}
