//! Scout and colony ship fitting
//!
//! Civilian designs skip the weighted module split. A scout is a small hull
//! with the best drive, scanner and fuel; a colony ship is the smallest hull
//! that carries the best colony base.

use serde::{Deserialize, Serialize};

use crate::catalog::{Component, ComponentCatalog, SpecialEffect};
use crate::core::types::{HullSize, ShipRole};
use crate::design::blueprint::{Blueprint, BASE_TRAVEL_RANGE};
use crate::design::fitter::{install_best_armor, install_fastest_engine, FitContext};
use crate::design::weapon_fit::{self, TargetSet};

/// What the faction currently asks of its colony ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColonyRequirements {
    /// Colony ships must be able to defend themselves
    pub armed: bool,
    /// Minimum travel range in parsecs
    pub min_range: u32,
}

impl ColonyRequirements {
    fn needs_fuel(&self) -> bool {
        self.min_range > BASE_TRAVEL_RANGE
    }
}

/// Install the best special of a kind that fits, if any
fn add_best_special(bp: &mut Blueprint, catalog: &ComponentCatalog, keep: impl FnMut(&SpecialEffect) -> bool) -> bool {
    let pick = catalog
        .specials_where(keep)
        .into_iter()
        .rev()
        .find(|c| bp.can_add_special(c))
        .cloned();
    match pick {
        Some(special) => {
            bp.add_special(special);
            true
        }
        None => false,
    }
}

pub fn fit_scout(catalog: &ComponentCatalog) -> Blueprint {
    let mut bp = Blueprint::new(ShipRole::Scout, HullSize::Small);
    install_fastest_engine(&mut bp, catalog);
    add_best_special(&mut bp, catalog, |e| matches!(e, SpecialEffect::Scanner(_)));
    add_best_special(&mut bp, catalog, |e| matches!(e, SpecialEffect::ReserveFuel(_)));
    bp
}

fn colony_ship_on(ctx: &FitContext<'_>, hull: HullSize, pod: &Component, requirements: ColonyRequirements) -> Blueprint {
    let mut bp = Blueprint::new(ShipRole::Colony, hull);
    install_fastest_engine(&mut bp, ctx.catalog);
    if bp.can_add_special(pod) {
        bp.add_special(pod.clone());
    }
    if requirements.needs_fuel() {
        add_best_special(&mut bp, ctx.catalog, |e| matches!(e, SpecialEffect::ReserveFuel(_)));
    }
    if requirements.armed {
        install_best_armor(&mut bp, ctx.catalog);
        let budget = bp.free_space();
        if let Some(spec) = weapon_fit::best_damage_spec(&bp, ctx.catalog, TargetSet::Ships(ctx.ship_targets), budget) {
            weapon_fit::install(&mut bp, spec, 1);
        }
    }
    bp.estimate_damage(ctx.ship_targets, ctx.colony_targets);
    bp
}

/// Highest environment colony base known, later tech breaking ties
fn best_colony_pod(catalog: &ComponentCatalog) -> Option<Component> {
    catalog
        .specials_where(|e| matches!(e, SpecialEffect::ColonyPod(_)))
        .into_iter()
        .max_by_key(|c| match c.special_effect() {
            Some(SpecialEffect::ColonyPod(environment)) => (environment, c.level),
            _ => (0, c.level),
        })
        .cloned()
}

/// Smallest hull carrying the best colony base and meeting the requirements.
///
/// Falls back to the largest hull when none qualifies, and to an empty small
/// hull when the catalog has no colony base at all.
pub fn fit_colony_ship(ctx: &FitContext<'_>, requirements: ColonyRequirements) -> Blueprint {
    let Some(pod) = best_colony_pod(ctx.catalog) else {
        let mut bp = Blueprint::new(ShipRole::Colony, HullSize::Small);
        install_fastest_engine(&mut bp, ctx.catalog);
        return bp;
    };

    let mut fallback = None;
    for hull in HullSize::ALL {
        let bp = colony_ship_on(ctx, hull, &pod, requirements);
        if bp.colony_pod_level().is_some() && meets_requirements(&bp, &requirements) {
            return bp;
        }
        fallback = Some(bp);
    }
    fallback.unwrap_or_else(|| Blueprint::new(ShipRole::Colony, HullSize::Huge))
}

/// Whether a colony design satisfies the current requirements
pub fn meets_requirements(bp: &Blueprint, requirements: &ColonyRequirements) -> bool {
    let armed = bp.weapon_total() > 0;
    bp.travel_range() >= requirements.min_range && armed == requirements.armed
}
