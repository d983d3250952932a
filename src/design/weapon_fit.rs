//! Weapon allocation passes
//!
//! Weapons are fitted in up to three passes: bombardment against colony
//! targets, a primary anti-ship pass and a secondary anti-ship pass. Each pass
//! picks one weapon family not yet on board and fills its share of the
//! weapon space with as many units as fit.

use tracing::debug;

use crate::catalog::{Component, ComponentCatalog, ComponentCategory, SpecialEffect, WeaponClass, WeaponProfile};
use crate::core::config::DesignerConfig;
use crate::core::types::Space;
use crate::design::blueprint::{worst_case, Blueprint};
use crate::design::fitter::FitContext;
use crate::rivals::{ColonyTarget, ShipTarget};

/// Which target set a pass is scored against
#[derive(Debug, Clone, Copy)]
pub enum TargetSet<'a> {
    Ships(&'a [ShipTarget]),
    Colonies(&'a [ColonyTarget]),
}

impl TargetSet<'_> {
    /// Worst-case damage of one weapon unit across the set
    fn damage(&self, weapon: &WeaponProfile, range_bonus: u32) -> f32 {
        match self {
            TargetSet::Ships(targets) => worst_case(targets, |t| weapon.damage_vs_ship(t, range_bonus)),
            TargetSet::Colonies(targets) => worst_case(targets, |t| weapon.damage_vs_colony(t)),
        }
    }

    fn accepts(&self, weapon: &WeaponProfile) -> bool {
        match self {
            TargetSet::Ships(_) => weapon.can_target_ships(),
            TargetSet::Colonies(_) => true,
        }
    }
}

/// Best (weapon, range special, count) found for one pass
#[derive(Debug, Clone, PartialEq)]
pub struct DamageSpec {
    pub weapon: Component,
    pub special: Option<Component>,
    pub count: u32,
    /// Count times worst-case damage per unit
    pub score: f32,
}

fn range_effect() -> SpecialEffect {
    SpecialEffect::RangeBonus(0)
}

/// Search the catalog for the best weapon to fill `budget` space.
///
/// Weapons of a class already on board are skipped. When a special slot is
/// free, each range special is tried as well, its space taken out of the
/// budget first. Only a strictly better score displaces the current best, and
/// the catalog is walked from the best weapon down.
pub fn best_damage_spec(
    bp: &Blueprint,
    catalog: &ComponentCatalog,
    targets: TargetSet<'_>,
    budget: Space,
) -> Option<DamageSpec> {
    let hull = bp.hull;
    let budget = budget.min(bp.free_space());
    let range_specials = if bp.special_slots_left() > 0 && !bp.has_special_kind(&range_effect()) {
        catalog.specials_where(|e| e.range_bonus().is_some())
    } else {
        Vec::new()
    };
    let installed_bonus = bp.range_bonus();

    let mut best: Option<DamageSpec> = None;
    let mut consider = |spec: DamageSpec| {
        if spec.count == 0 || spec.score <= 0.0 {
            return;
        }
        if best.as_ref().map_or(true, |b| spec.score > b.score) {
            best = Some(spec);
        }
    };

    for weapon in catalog.components_of(ComponentCategory::Weapon).iter().rev() {
        let Some(profile) = weapon.weapon() else { continue };
        let space = weapon.space(hull);
        if space == 0 || !targets.accepts(profile) || bp.has_weapon_class(profile.class) {
            continue;
        }

        let count = budget / space;
        consider(DamageSpec {
            weapon: weapon.clone(),
            special: None,
            count,
            score: count as f32 * targets.damage(profile, installed_bonus),
        });

        for special in range_specials.iter().rev() {
            let special_space = special.space(hull);
            if special_space > budget {
                continue;
            }
            let bonus = special
                .special_effect()
                .and_then(|e| e.range_bonus())
                .unwrap_or(0)
                .max(installed_bonus);
            let count = (budget - special_space) / space;
            consider(DamageSpec {
                weapon: weapon.clone(),
                special: Some((*special).clone()),
                count,
                score: count as f32 * targets.damage(profile, bonus),
            });
        }
    }

    best
}

/// Install a damage spec, spreading its count over up to `slots` weapon slots
pub fn install(bp: &mut Blueprint, spec: DamageSpec, slots: usize) {
    if let Some(special) = spec.special {
        bp.add_special(special);
    }

    let slots = slots.min(bp.weapon_slots_left());
    let mut remaining = spec.count;
    for filled in 0..slots {
        if remaining == 0 {
            break;
        }
        let slots_left = (slots - filled) as u32;
        let units = remaining.div_ceil(slots_left);
        bp.add_weapons(spec.weapon.clone(), units);
        remaining -= units;
    }
}

/// Run one pass; returns the space it consumed
fn run_pass(bp: &mut Blueprint, catalog: &ComponentCatalog, targets: TargetSet<'_>, budget: Space, slots: usize) -> Space {
    if budget == 0 || slots == 0 || bp.weapon_slots_left() == 0 {
        return 0;
    }
    let Some(spec) = best_damage_spec(bp, catalog, targets, budget) else {
        return 0;
    };

    debug!(
        "{} {:?}: {} x {} ({:?}) score {:.2}",
        bp.role.name(),
        bp.hull,
        spec.count,
        spec.weapon.name,
        spec.special.as_ref().map(|s| s.name.as_str()),
        spec.score
    );

    let before = bp.free_space();
    install(bp, spec, slots);
    before - bp.free_space()
}

/// Fit bombardment, primary and secondary weapon passes
pub fn fit_weapons(bp: &mut Blueprint, ctx: &FitContext<'_>) {
    let config = ctx.config;
    let weapon_space = (bp.free_space() as f32 * config.weapon_fraction(bp.hull)).floor() as Space;
    let bombard_space = (weapon_space as f32 * config.bombard_share(bp.role, bp.hull)).floor() as Space;
    let ship_space = weapon_space - bombard_space;

    run_pass(bp, ctx.catalog, TargetSet::Colonies(ctx.colony_targets), bombard_space, 1);

    let slots_left = bp.weapon_slots_left();
    if slots_left == 0 {
        return;
    }
    let primary_slots = slots_left.saturating_sub(1).max(1);
    let share = if slots_left == 1 { 1.0 } else { config.primary_pass_share };
    let primary_budget = (ship_space as f32 * share).floor() as Space;
    let used = run_pass(bp, ctx.catalog, TargetSet::Ships(ctx.ship_targets), primary_budget, primary_slots);

    let secondary_budget = ship_space.saturating_sub(used);
    run_pass(bp, ctx.catalog, TargetSet::Ships(ctx.ship_targets), secondary_budget, 1);
}

/// Trade primary beam units for a range special when the loss is small.
///
/// Only tried when the design is slower than the fastest maneuver the
/// catalog offers; fast ships close the distance on their own.
pub fn trade_for_range(bp: &mut Blueprint, catalog: &ComponentCatalog, config: &DesignerConfig) {
    let Some(primary) = bp.primary_weapon().cloned() else { return };
    if primary.weapon_class() != Some(WeaponClass::Beam)
        || bp.special_slots_left() == 0
        || bp.has_special_kind(&range_effect())
        || bp.combat_speed() >= catalog.max_combat_speed()
    {
        return;
    }

    let hull = bp.hull;
    let count = bp.weapon_count(primary.id);
    let weapon_space = primary.space(hull);

    for special in catalog.specials_where(|e| e.range_bonus().is_some()).into_iter().rev() {
        let range = special.special_effect().and_then(|e| e.range_bonus()).unwrap_or(0);
        let shortfall = special.space(hull).saturating_sub(bp.free_space());
        let removed = shortfall.div_ceil(weapon_space);
        if removed >= count {
            continue;
        }

        let kept = count - removed;
        let floor = (count as f32 * config.range_decay.powi(range as i32)).ceil() as u32;
        if kept >= floor {
            bp.remove_weapons(primary.id, removed);
            bp.add_special(special.clone());
            debug!("{}: traded {} x {} for {}", bp.role.name(), removed, primary.name, special.name);
            return;
        }
    }
}
