//! Blueprint fitter - greedy multi-pass allocation for combat roles
//!
//! Drive and armor go in first. A share of what remains is split across the
//! support modules by role weights, weapons take most of the rest, and a
//! second module pass spends whatever the weapons left over.

use tracing::debug;

use crate::catalog::{Component, ComponentCatalog, ComponentCategory};
use crate::core::config::{CategoryWeights, DesignerConfig};
use crate::core::types::{HullSize, ShipRole, Space};
use crate::design::blueprint::{Blueprint, ModuleSlot};
use crate::design::weapon_fit;
use crate::faction::RaceProfile;
use crate::rivals::{ColonyTarget, RivalAssessment, ShipTarget};

/// Everything the fitter reads; nothing in it is modified while fitting
#[derive(Debug, Clone, Copy)]
pub struct FitContext<'a> {
    pub catalog: &'a ComponentCatalog,
    pub race: &'a RaceProfile,
    pub config: &'a DesignerConfig,
    pub ship_targets: &'a [ShipTarget],
    pub colony_targets: &'a [ColonyTarget],
}

impl<'a> FitContext<'a> {
    pub fn new(
        catalog: &'a ComponentCatalog,
        race: &'a RaceProfile,
        config: &'a DesignerConfig,
        assessment: &'a RivalAssessment,
    ) -> Self {
        Self {
            catalog,
            race,
            config,
            ship_targets: &assessment.ship_targets,
            colony_targets: &assessment.colony_targets,
        }
    }
}

/// How a module pass budgets space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleBudget {
    /// Split this much space by role weights, carrying leftovers forward
    Split(Space),
    /// Every category may use all free space; maneuver ties allowed
    Fill,
}

/// Support module categories in the order a role fills them
pub fn module_order(role: ShipRole) -> [ComponentCategory; 5] {
    use ComponentCategory::*;
    match role {
        ShipRole::Fighter => [Maneuver, Computer, Shield, Ecm, Special],
        ShipRole::Bomber => [Shield, Ecm, Maneuver, Computer, Special],
        ShipRole::Destroyer | ShipRole::Scout | ShipRole::Colony => [Computer, Shield, Maneuver, Ecm, Special],
    }
}

fn weight_of(weights: &CategoryWeights, category: ComponentCategory) -> u32 {
    match category {
        ComponentCategory::Computer => weights.computer,
        ComponentCategory::Shield => weights.shield,
        ComponentCategory::Ecm => weights.ecm,
        ComponentCategory::Maneuver => weights.maneuver,
        ComponentCategory::Special => weights.special,
        ComponentCategory::Engine | ComponentCategory::Armor | ComponentCategory::Weapon => 0,
    }
}

fn module_slot(category: ComponentCategory) -> Option<ModuleSlot> {
    match category {
        ComponentCategory::Engine => Some(ModuleSlot::Engine),
        ComponentCategory::Armor => Some(ModuleSlot::Armor),
        ComponentCategory::Computer => Some(ModuleSlot::Computer),
        ComponentCategory::Shield => Some(ModuleSlot::Shield),
        ComponentCategory::Ecm => Some(ModuleSlot::Ecm),
        ComponentCategory::Maneuver => Some(ModuleSlot::Maneuver),
        ComponentCategory::Special | ComponentCategory::Weapon => None,
    }
}

/// Fit a combat design on one hull
pub fn fit(ctx: &FitContext<'_>, role: ShipRole, hull: HullSize) -> Blueprint {
    debug_assert!(role.is_combat(), "{:?} is fitted by the civilian fitter", role);

    let mut bp = Blueprint::new(role, hull);
    install_fastest_engine(&mut bp, ctx.catalog);
    install_best_armor(&mut bp, ctx.catalog);

    let ratio = ctx.config.module_ratio(ctx.race.module_ratio, hull);
    let module_space = (bp.free_space() as f32 * ratio).floor() as Space;
    module_pass(&mut bp, ctx, ModuleBudget::Split(module_space));

    weapon_fit::fit_weapons(&mut bp, ctx);

    module_pass(&mut bp, ctx, ModuleBudget::Fill);
    weapon_fit::trade_for_range(&mut bp, ctx.catalog, ctx.config);

    bp.estimate_damage(ctx.ship_targets, ctx.colony_targets);
    debug!(
        "Fitted {} on {:?}: cost {:.1}, ship {:.2}, colony {:.2}, free {}",
        role.name(),
        hull,
        bp.cost(),
        bp.ship_damage,
        bp.colony_damage,
        bp.free_space()
    );
    bp
}

/// Fastest engine that fits, later tech preferred on equal warp
pub(crate) fn install_fastest_engine(bp: &mut Blueprint, catalog: &ComponentCatalog) {
    let engine = catalog
        .components_of(ComponentCategory::Engine)
        .iter()
        .filter(|c| bp.can_install(ModuleSlot::Engine, c))
        .max_by_key(|c| (c.warp(), c.level))
        .cloned();
    if let Some(engine) = engine {
        bp.install(ModuleSlot::Engine, engine);
    }
}

/// Best non-reinforced armor that fits
pub(crate) fn install_best_armor(bp: &mut Blueprint, catalog: &ComponentCatalog) {
    let armor = catalog
        .components_of(ComponentCategory::Armor)
        .iter()
        .rev()
        .find(|c| !c.is_reinforced_armor() && bp.can_install(ModuleSlot::Armor, c))
        .cloned();
    if let Some(armor) = armor {
        bp.install(ModuleSlot::Armor, armor);
    }
}

fn module_pass(bp: &mut Blueprint, ctx: &FitContext<'_>, budget: ModuleBudget) {
    let weights = ctx.config.role_weights(bp.role).biased(&ctx.race.weight_bias);
    let total = weights.total();
    let allow_speed_ties = budget == ModuleBudget::Fill;

    let mut leftover: i64 = 0;
    for category in module_order(bp.role) {
        let allotted = match budget {
            ModuleBudget::Split(space) if total > 0 => {
                let share = space as u64 * weight_of(&weights, category) as u64 / total as u64;
                share as i64 + leftover
            }
            ModuleBudget::Split(_) => 0,
            ModuleBudget::Fill => bp.free_space() as i64,
        };

        let consumed = match module_slot(category) {
            Some(slot) => upgrade_module(bp, ctx.catalog, slot, allotted, allow_speed_ties),
            None => fill_specials(bp, ctx.catalog, allotted),
        };
        leftover = allotted - consumed;
    }
}

/// Walk a category from best to worst and install the first variant within
/// budget. Returns the space delta consumed.
fn upgrade_module(
    bp: &mut Blueprint,
    catalog: &ComponentCatalog,
    slot: ModuleSlot,
    allotted: i64,
    allow_speed_ties: bool,
) -> i64 {
    let installed_level = bp.module(slot).map(|c| c.level);
    let current_speed = bp.combat_speed();
    let warp_cap = bp.warp().max(1);

    let mut choice: Option<(Component, i64)> = None;
    for candidate in catalog.components_of(slot.category()).iter().rev() {
        if installed_level.is_some_and(|level| candidate.level <= level) {
            break;
        }
        if slot == ModuleSlot::Maneuver {
            let speed = candidate.combat_speed().unwrap_or(1).min(warp_cap);
            let improves = if allow_speed_ties { speed >= current_speed } else { speed > current_speed };
            if !improves {
                continue;
            }
        }
        let delta = bp.space_delta(slot, candidate);
        if delta <= allotted && bp.can_install(slot, candidate) {
            choice = Some((candidate.clone(), delta));
            break;
        }
    }

    match choice {
        Some((component, delta)) => {
            bp.install(slot, component);
            delta
        }
        None => 0,
    }
}

/// Fill free special slots with combat specials not already carried
fn fill_specials(bp: &mut Blueprint, catalog: &ComponentCatalog, allotted: i64) -> i64 {
    let hull = bp.hull;
    let mut consumed: i64 = 0;
    while bp.special_slots_left() > 0 {
        let pick = catalog
            .specials_where(|e| e.is_combat() && !bp.has_special_kind(e))
            .into_iter()
            .rev()
            .find(|c| consumed + c.space(hull) as i64 <= allotted && bp.can_add_special(c))
            .cloned();
        let Some(special) = pick else { break };
        consumed += special.space(hull) as i64;
        bp.add_special(special);
    }
    consumed
}
