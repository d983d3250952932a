//! Ship components - one variant of one module category

use serde::{Deserialize, Serialize};

use crate::catalog::weapons::{WeaponClass, WeaponProfile};
use crate::core::types::{ComponentId, HullSize, Space};

/// Module category a component occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    Engine,
    Armor,
    Computer,
    Shield,
    Ecm,
    Maneuver,
    Special,
    Weapon,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 8] = [
        ComponentCategory::Engine,
        ComponentCategory::Armor,
        ComponentCategory::Computer,
        ComponentCategory::Shield,
        ComponentCategory::Ecm,
        ComponentCategory::Maneuver,
        ComponentCategory::Special,
        ComponentCategory::Weapon,
    ];
}

/// Special equipment effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Extends beam weapon range
    RangeBonus(u32),
    /// Pushes attackers back; short-ranged weapons struggle to connect
    Repulsor,
    /// Intercepts incoming missiles
    Interdictor,
    /// Detection range
    Scanner(u32),
    /// Extra travel range in parsecs
    ReserveFuel(u32),
    /// Colony module; value is the harshest environment it can settle
    ColonyPod(u32),
    /// Percent of hits repaired per turn
    AutoRepair(u32),
}

impl SpecialEffect {
    /// Specials the module pass may install on a warship
    pub fn is_combat(&self) -> bool {
        matches!(self, SpecialEffect::Repulsor | SpecialEffect::Interdictor | SpecialEffect::AutoRepair(_))
    }

    pub fn range_bonus(&self) -> Option<u32> {
        match self {
            SpecialEffect::RangeBonus(r) => Some(*r),
            _ => None,
        }
    }

    /// Same effect family, ignoring magnitude
    pub fn same_kind(&self, other: &SpecialEffect) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Category payload of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ComponentKind {
    Engine {
        warp: u32,
    },
    Armor {
        hit_multiplier: f32,
        #[serde(default)]
        reinforced: bool,
    },
    Computer {
        attack: u32,
    },
    Shield {
        absorb: u32,
    },
    Ecm {
        missile_defense: u32,
    },
    Maneuver {
        combat_speed: u32,
    },
    Special {
        effect: SpecialEffect,
    },
    Weapon(WeaponProfile),
}

/// One catalog variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: ComponentId,
    pub name: String,
    /// Ordinal effectiveness within the category
    pub level: u32,
    /// Space on a small hull, or on any hull when not hull-scaled
    pub base_space: Space,
    pub base_cost: f32,
    #[serde(default)]
    pub hull_scaled: bool,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    pub fn category(&self) -> ComponentCategory {
        match self.kind {
            ComponentKind::Engine { .. } => ComponentCategory::Engine,
            ComponentKind::Armor { .. } => ComponentCategory::Armor,
            ComponentKind::Computer { .. } => ComponentCategory::Computer,
            ComponentKind::Shield { .. } => ComponentCategory::Shield,
            ComponentKind::Ecm { .. } => ComponentCategory::Ecm,
            ComponentKind::Maneuver { .. } => ComponentCategory::Maneuver,
            ComponentKind::Special { .. } => ComponentCategory::Special,
            ComponentKind::Weapon(_) => ComponentCategory::Weapon,
        }
    }

    /// Space taken on the given hull
    pub fn space(&self, hull: HullSize) -> Space {
        if self.hull_scaled {
            self.base_space * hull.scale()
        } else {
            self.base_space
        }
    }

    /// Cost of one unit on the given hull
    pub fn cost(&self, hull: HullSize) -> f32 {
        if self.hull_scaled {
            self.base_cost * hull.scale() as f32
        } else {
            self.base_cost
        }
    }

    pub fn warp(&self) -> Option<u32> {
        match self.kind {
            ComponentKind::Engine { warp } => Some(warp),
            _ => None,
        }
    }

    pub fn is_reinforced_armor(&self) -> bool {
        matches!(self.kind, ComponentKind::Armor { reinforced: true, .. })
    }

    pub fn combat_speed(&self) -> Option<u32> {
        match self.kind {
            ComponentKind::Maneuver { combat_speed } => Some(combat_speed),
            _ => None,
        }
    }

    pub fn special_effect(&self) -> Option<SpecialEffect> {
        match self.kind {
            ComponentKind::Special { effect } => Some(effect),
            _ => None,
        }
    }

    pub fn weapon(&self) -> Option<&WeaponProfile> {
        match &self.kind {
            ComponentKind::Weapon(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn weapon_class(&self) -> Option<WeaponClass> {
        self.weapon().map(|w| w.class)
    }

    // === Constructors for hand-built catalogs ===

    fn new(name: &str, level: u32, base_space: Space, base_cost: f32, hull_scaled: bool, kind: ComponentKind) -> Self {
        Self {
            id: ComponentId::default(),
            name: name.to_string(),
            level,
            base_space,
            base_cost,
            hull_scaled,
            kind,
        }
    }

    pub fn engine(name: &str, level: u32, warp: u32, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Engine { warp })
    }

    pub fn armor(name: &str, level: u32, hit_multiplier: f32, reinforced: bool, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Armor { hit_multiplier, reinforced })
    }

    pub fn computer(name: &str, level: u32, attack: u32, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Computer { attack })
    }

    pub fn shield(name: &str, level: u32, absorb: u32, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Shield { absorb })
    }

    pub fn ecm(name: &str, level: u32, missile_defense: u32, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Ecm { missile_defense })
    }

    pub fn maneuver(name: &str, level: u32, combat_speed: u32, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, true, ComponentKind::Maneuver { combat_speed })
    }

    pub fn special(name: &str, level: u32, effect: SpecialEffect, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, false, ComponentKind::Special { effect })
    }

    pub fn weapon_of(name: &str, level: u32, profile: WeaponProfile, base_space: Space, base_cost: f32) -> Self {
        Self::new(name, level, base_space, base_cost, false, ComponentKind::Weapon(profile))
    }
}
