//! Blueprint - a ship design on one hull
//!
//! A blueprint is built up component by component. Every install checks the
//! capacity invariant: installed space never exceeds the hull's capacity.
//! Callers test for fit first; an install that would overflow is a bug.

use serde::{Deserialize, Serialize};

use crate::catalog::{Component, ComponentCategory, ComponentKind, SpecialEffect, WeaponClass};
use crate::core::types::{ComponentId, DesignId, HullSize, ShipRole, Space};
use crate::rivals::{ColonyTarget, ShipTarget};

pub const MAX_SPECIALS: usize = 3;
pub const MAX_WEAPON_SLOTS: usize = 4;

/// Travel range of a hull without reserve fuel
pub const BASE_TRAVEL_RANGE: u32 = 3;

/// Single-choice module positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleSlot {
    Engine,
    Armor,
    Computer,
    Shield,
    Ecm,
    Maneuver,
}

impl ModuleSlot {
    pub fn category(&self) -> ComponentCategory {
        match self {
            ModuleSlot::Engine => ComponentCategory::Engine,
            ModuleSlot::Armor => ComponentCategory::Armor,
            ModuleSlot::Computer => ComponentCategory::Computer,
            ModuleSlot::Shield => ComponentCategory::Shield,
            ModuleSlot::Ecm => ComponentCategory::Ecm,
            ModuleSlot::Maneuver => ComponentCategory::Maneuver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub weapon: Component,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: DesignId,
    pub name: String,
    pub role: ShipRole,
    pub hull: HullSize,
    engine: Option<Component>,
    armor: Option<Component>,
    computer: Option<Component>,
    shield: Option<Component>,
    ecm: Option<Component>,
    maneuver: Option<Component>,
    specials: Vec<Component>,
    weapons: Vec<WeaponSlot>,
    /// Worst-case damage per combat turn against rival ships
    pub ship_damage: f32,
    /// Worst-case damage per combat turn against rival colonies
    pub colony_damage: f32,
}

impl Blueprint {
    pub fn new(role: ShipRole, hull: HullSize) -> Self {
        Self {
            id: DesignId::default(),
            name: String::new(),
            role,
            hull,
            engine: None,
            armor: None,
            computer: None,
            shield: None,
            ecm: None,
            maneuver: None,
            specials: Vec::new(),
            weapons: Vec::new(),
            ship_damage: 0.0,
            colony_damage: 0.0,
        }
    }

    // === Space accounting ===

    pub fn capacity(&self) -> Space {
        self.hull.capacity()
    }

    pub fn used_space(&self) -> Space {
        let hull = self.hull;
        let modules: Space = self.modules().map(|c| c.space(hull)).sum();
        let specials: Space = self.specials.iter().map(|c| c.space(hull)).sum();
        let weapons: Space = self.weapons.iter().map(|w| w.weapon.space(hull) * w.count).sum();
        modules + specials + weapons
    }

    pub fn free_space(&self) -> Space {
        let used = self.used_space();
        assert!(used <= self.capacity(), "blueprint {} overflows its hull: {} > {}", self.name, used, self.capacity());
        self.capacity() - used
    }

    pub fn free_fraction(&self) -> f32 {
        self.free_space() as f32 / self.capacity() as f32
    }

    fn check_capacity(&self) {
        assert!(
            self.used_space() <= self.capacity(),
            "install overflowed {:?} hull of {}",
            self.hull,
            self.name
        );
    }

    // === Modules ===

    fn modules(&self) -> impl Iterator<Item = &Component> {
        [&self.engine, &self.armor, &self.computer, &self.shield, &self.ecm, &self.maneuver]
            .into_iter()
            .flatten()
    }

    pub fn module(&self, slot: ModuleSlot) -> Option<&Component> {
        match slot {
            ModuleSlot::Engine => self.engine.as_ref(),
            ModuleSlot::Armor => self.armor.as_ref(),
            ModuleSlot::Computer => self.computer.as_ref(),
            ModuleSlot::Shield => self.shield.as_ref(),
            ModuleSlot::Ecm => self.ecm.as_ref(),
            ModuleSlot::Maneuver => self.maneuver.as_ref(),
        }
    }

    fn module_mut(&mut self, slot: ModuleSlot) -> &mut Option<Component> {
        match slot {
            ModuleSlot::Engine => &mut self.engine,
            ModuleSlot::Armor => &mut self.armor,
            ModuleSlot::Computer => &mut self.computer,
            ModuleSlot::Shield => &mut self.shield,
            ModuleSlot::Ecm => &mut self.ecm,
            ModuleSlot::Maneuver => &mut self.maneuver,
        }
    }

    /// Space change from swapping the installed module for `candidate`
    pub fn space_delta(&self, slot: ModuleSlot, candidate: &Component) -> i64 {
        let current = self.module(slot).map(|c| c.space(self.hull)).unwrap_or(0);
        candidate.space(self.hull) as i64 - current as i64
    }

    pub fn can_install(&self, slot: ModuleSlot, candidate: &Component) -> bool {
        self.space_delta(slot, candidate) <= self.free_space() as i64
    }

    /// Install a module, returning the one it replaced
    pub fn install(&mut self, slot: ModuleSlot, component: Component) -> Option<Component> {
        debug_assert_eq!(slot.category(), component.category());
        let replaced = self.module_mut(slot).replace(component);
        self.check_capacity();
        replaced
    }

    pub fn clear_module(&mut self, slot: ModuleSlot) -> Option<Component> {
        self.module_mut(slot).take()
    }

    // === Specials ===

    pub fn specials(&self) -> &[Component] {
        &self.specials
    }

    pub fn special_slots_left(&self) -> usize {
        MAX_SPECIALS - self.specials.len()
    }

    pub fn has_special_kind(&self, effect: &SpecialEffect) -> bool {
        self.specials
            .iter()
            .filter_map(|c| c.special_effect())
            .any(|e| e.same_kind(effect))
    }

    pub fn can_add_special(&self, special: &Component) -> bool {
        self.special_slots_left() > 0 && special.space(self.hull) <= self.free_space()
    }

    pub fn add_special(&mut self, special: Component) {
        assert!(self.special_slots_left() > 0, "no special slot left on {}", self.name);
        self.specials.push(special);
        self.check_capacity();
    }

    // === Weapons ===

    pub fn weapons(&self) -> &[WeaponSlot] {
        &self.weapons
    }

    pub fn weapon_slots_left(&self) -> usize {
        MAX_WEAPON_SLOTS - self.weapons.len()
    }

    pub fn add_weapons(&mut self, weapon: Component, count: u32) {
        assert!(self.weapon_slots_left() > 0, "no weapon slot left on {}", self.name);
        if count == 0 {
            return;
        }
        self.weapons.push(WeaponSlot { weapon, count });
        self.check_capacity();
    }

    /// Units of a weapon across all slots
    pub fn weapon_count(&self, id: ComponentId) -> u32 {
        self.weapons.iter().filter(|w| w.weapon.id == id).map(|w| w.count).sum()
    }

    pub fn weapon_total(&self) -> u32 {
        self.weapons.iter().map(|w| w.count).sum()
    }

    /// Remove up to `count` units of a weapon, emptying later slots first
    pub fn remove_weapons(&mut self, id: ComponentId, count: u32) -> u32 {
        let mut left = count;
        for slot in self.weapons.iter_mut().rev().filter(|w| w.weapon.id == id) {
            let taken = left.min(slot.count);
            slot.count -= taken;
            left -= taken;
            if left == 0 {
                break;
            }
        }
        self.weapons.retain(|w| w.count > 0);
        count - left
    }

    pub fn has_weapon_class(&self, class: WeaponClass) -> bool {
        self.weapons.iter().any(|w| w.weapon.weapon_class() == Some(class))
    }

    /// Weapon taking the most space on board
    pub fn primary_weapon(&self) -> Option<&Component> {
        let hull = self.hull;
        let mut best: Option<(&Component, Space)> = None;
        for slot in &self.weapons {
            let total = self.weapon_count(slot.weapon.id) * slot.weapon.space(hull);
            if best.map_or(true, |(_, space)| total > space) {
                best = Some((&slot.weapon, total));
            }
        }
        best.map(|(weapon, _)| weapon)
    }

    // === Derived values ===

    pub fn cost(&self) -> f32 {
        let hull = self.hull;
        let modules: f32 = self.modules().map(|c| c.cost(hull)).sum();
        let specials: f32 = self.specials.iter().map(|c| c.cost(hull)).sum();
        let weapons: f32 = self.weapons.iter().map(|w| w.weapon.cost(hull) * w.count as f32).sum();
        self.hull.base_cost() + modules + specials + weapons
    }

    pub fn hits(&self) -> f32 {
        let multiplier = match self.armor.as_ref().map(|a| &a.kind) {
            Some(ComponentKind::Armor { hit_multiplier, .. }) => *hit_multiplier,
            _ => 1.0,
        };
        self.hull.base_hits() * multiplier
    }

    /// Strategic speed
    pub fn warp(&self) -> u32 {
        self.engine.as_ref().and_then(|e| e.warp()).unwrap_or(0)
    }

    /// Tactical speed; thrusters cannot outrun the engine
    pub fn combat_speed(&self) -> u32 {
        let thrust = self.maneuver.as_ref().and_then(|m| m.combat_speed()).unwrap_or(1);
        thrust.min(self.warp().max(1))
    }

    pub fn shield_level(&self) -> u32 {
        match self.shield.as_ref().map(|s| &s.kind) {
            Some(ComponentKind::Shield { absorb }) => *absorb,
            _ => 0,
        }
    }

    pub fn attack_level(&self) -> u32 {
        match self.computer.as_ref().map(|c| &c.kind) {
            Some(ComponentKind::Computer { attack }) => *attack,
            _ => 0,
        }
    }

    pub fn ecm_level(&self) -> u32 {
        match self.ecm.as_ref().map(|c| &c.kind) {
            Some(ComponentKind::Ecm { missile_defense }) => *missile_defense,
            _ => 0,
        }
    }

    pub fn range_bonus(&self) -> u32 {
        self.specials
            .iter()
            .filter_map(|c| c.special_effect().and_then(|e| e.range_bonus()))
            .max()
            .unwrap_or(0)
    }

    pub fn travel_range(&self) -> u32 {
        let fuel = self
            .specials
            .iter()
            .filter_map(|c| match c.special_effect() {
                Some(SpecialEffect::ReserveFuel(r)) => Some(r),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        BASE_TRAVEL_RANGE + fuel
    }

    pub fn colony_pod_level(&self) -> Option<u32> {
        self.specials
            .iter()
            .filter_map(|c| match c.special_effect() {
                Some(SpecialEffect::ColonyPod(level)) => Some(level),
                _ => None,
            })
            .max()
    }

    /// Damage estimate that matters for this design's role
    pub fn per_turn_damage(&self) -> f32 {
        match self.role {
            ShipRole::Fighter => self.ship_damage,
            ShipRole::Bomber => self.colony_damage,
            ShipRole::Destroyer => self.ship_damage + self.colony_damage,
            ShipRole::Scout | ShipRole::Colony => 0.0,
        }
    }

    pub fn damage_per_cost(&self) -> f32 {
        let cost = self.cost();
        if cost <= 0.0 {
            return 0.0;
        }
        self.per_turn_damage() / cost
    }

    /// Total damage against each ship target, minimum taken
    pub fn ship_damage_against(&self, targets: &[ShipTarget]) -> f32 {
        let bonus = self.range_bonus();
        worst_case(targets, |target| {
            self.weapons
                .iter()
                .filter_map(|slot| slot.weapon.weapon().map(|w| w.damage_vs_ship(target, bonus) * slot.count as f32))
                .sum()
        })
    }

    /// Total damage against each colony target, minimum taken
    pub fn colony_damage_against(&self, targets: &[ColonyTarget]) -> f32 {
        worst_case(targets, |target| {
            self.weapons
                .iter()
                .filter_map(|slot| slot.weapon.weapon().map(|w| w.damage_vs_colony(target) * slot.count as f32))
                .sum()
        })
    }

    /// Refresh the stored damage estimates
    pub fn estimate_damage(&mut self, ship_targets: &[ShipTarget], colony_targets: &[ColonyTarget]) {
        self.ship_damage = self.ship_damage_against(ship_targets);
        self.colony_damage = self.colony_damage_against(colony_targets);
    }

    /// Installed components by category, name and level; weapons with counts
    fn signature(&self) -> Vec<(ComponentCategory, &str, u32, u32)> {
        let mut parts: Vec<_> = self
            .modules()
            .chain(self.specials.iter())
            .map(|c| (c.category(), c.name.as_str(), c.level, 1))
            .collect();
        for slot in &self.weapons {
            parts.push((ComponentCategory::Weapon, slot.weapon.name.as_str(), slot.weapon.level, slot.count));
        }
        parts.sort();
        parts
    }

    /// Functionally identical: same hull and the same components
    pub fn same_components(&self, other: &Blueprint) -> bool {
        self.hull == other.hull && self.signature() == other.signature()
    }
}

/// Minimum over targets; no targets means nothing to damage
pub(crate) fn worst_case<T>(targets: &[T], damage: impl Fn(&T) -> f32) -> f32 {
    targets.iter().map(damage).reduce(f32::min).unwrap_or(0.0)
}
