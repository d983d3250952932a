//! Weapon profiles and the damage model used when scoring designs
//!
//! Damage is an estimate of what a single weapon does to one target per
//! combat turn. It is never used to resolve a battle, only to rank designs.

use serde::{Deserialize, Serialize};

use crate::rivals::{ColonyTarget, ShipTarget};

/// Damage multiplier for short-ranged weapons against a repulsor-equipped target
pub const REPULSOR_PENALTY: f32 = 0.25;

/// Damage multiplier for missiles against a target carrying interdictors
pub const INTERDICTOR_PENALTY: f32 = 0.5;

/// Weapons with less range than this cannot close on a repulsor ship
pub const REPULSOR_RANGE: u32 = 2;

/// Broad weapon family
///
/// Designs carry at most one weapon of each family; later weapon passes look
/// for a family not yet on board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponClass {
    Beam,
    Missile,
    Streaming,
    /// Bombardment only, cannot engage ships
    Bomb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub class: WeaponClass,
    pub damage_min: f32,
    pub damage_max: f32,
    #[serde(default = "default_attacks")]
    pub attacks: u32,
    #[serde(default = "default_range")]
    pub range: u32,
    /// Target shields count half against this weapon
    #[serde(default)]
    pub halves_shields: bool,
}

fn default_attacks() -> u32 {
    1
}

fn default_range() -> u32 {
    1
}

impl WeaponProfile {
    pub fn average_damage(&self) -> f32 {
        (self.damage_min + self.damage_max) / 2.0
    }

    pub fn can_target_ships(&self) -> bool {
        self.class != WeaponClass::Bomb
    }

    /// Range after specials; only beams benefit from range bonuses
    pub fn effective_range(&self, range_bonus: u32) -> u32 {
        match self.class {
            WeaponClass::Beam => self.range + range_bonus,
            WeaponClass::Missile | WeaponClass::Streaming | WeaponClass::Bomb => self.range,
        }
    }

    fn damage_through(&self, shield: u32) -> f32 {
        let shield = if self.halves_shields {
            shield as f32 / 2.0
        } else {
            shield as f32
        };
        (self.average_damage() - shield).max(0.0) * self.attacks as f32
    }

    /// Expected damage per combat turn against a ship target
    pub fn damage_vs_ship(&self, target: &ShipTarget, range_bonus: u32) -> f32 {
        if !self.can_target_ships() {
            return 0.0;
        }

        let mut damage = self.damage_through(target.shield);
        if target.repulsor && self.effective_range(range_bonus) < REPULSOR_RANGE {
            damage *= REPULSOR_PENALTY;
        }
        if target.interdictor && self.class == WeaponClass::Missile {
            damage *= INTERDICTOR_PENALTY;
        }
        damage
    }

    /// Expected damage per combat turn against a colony
    pub fn damage_vs_colony(&self, target: &ColonyTarget) -> f32 {
        self.damage_through(target.shield)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser() -> WeaponProfile {
        WeaponProfile {
            class: WeaponClass::Beam,
            damage_min: 1.0,
            damage_max: 5.0,
            attacks: 1,
            range: 1,
            halves_shields: false,
        }
    }

    fn open_target() -> ShipTarget {
        ShipTarget { shield: 0, interdictor: false, repulsor: false }
    }

    #[test]
    fn test_shields_absorb_damage() {
        let weapon = laser();
        assert_eq!(weapon.damage_vs_ship(&open_target(), 0), 3.0);
        assert_eq!(weapon.damage_vs_ship(&ShipTarget { shield: 2, ..open_target() }, 0), 1.0);
        assert_eq!(weapon.damage_vs_ship(&ShipTarget { shield: 5, ..open_target() }, 0), 0.0);
    }

    #[test]
    fn test_shield_halving() {
        let weapon = WeaponProfile { halves_shields: true, ..laser() };
        assert_eq!(weapon.damage_vs_ship(&ShipTarget { shield: 2, ..open_target() }, 0), 2.0);
    }

    #[test]
    fn test_repulsor_blunts_short_beams_unless_range_extended() {
        let weapon = laser();
        let target = ShipTarget { repulsor: true, ..open_target() };
        assert_eq!(weapon.damage_vs_ship(&target, 0), 3.0 * REPULSOR_PENALTY);
        assert_eq!(weapon.damage_vs_ship(&target, 1), 3.0);
    }

    #[test]
    fn test_range_bonus_only_helps_beams() {
        let missile = WeaponProfile { class: WeaponClass::Missile, ..laser() };
        assert_eq!(missile.effective_range(2), 1);
        assert_eq!(laser().effective_range(2), 3);
    }

    #[test]
    fn test_interdictor_halves_missiles() {
        let missile = WeaponProfile { class: WeaponClass::Missile, range: 3, ..laser() };
        let target = ShipTarget { interdictor: true, ..open_target() };
        assert_eq!(missile.damage_vs_ship(&target, 0), 1.5);
        assert_eq!(laser().damage_vs_ship(&target, 0), 3.0);
    }

    #[test]
    fn test_bombs_only_hit_colonies() {
        let bomb = WeaponProfile {
            class: WeaponClass::Bomb,
            damage_min: 4.0,
            damage_max: 16.0,
            ..laser()
        };
        assert_eq!(bomb.damage_vs_ship(&open_target(), 0), 0.0);
        assert_eq!(bomb.damage_vs_colony(&ColonyTarget { shield: 5 }), 5.0);
    }
}
