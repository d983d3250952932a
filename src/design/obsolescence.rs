//! Obsolescence state machine
//!
//! Decides when a fielded design is outclassed and how it leaves service.
//! Every transition is a pure function of the current state and its inputs;
//! applying the resulting action to the slot pool happens in `turn`.

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentCatalog;
use crate::core::config::DesignerConfig;
use crate::core::types::ShipRole;
use crate::design::blueprint::Blueprint;
use crate::design::civilian::{fit_colony_ship, fit_scout, meets_requirements, ColonyRequirements};
use crate::design::fitter::FitContext;
use crate::design::selector::{refreshed, select_best};

/// Scale of one tech level difference in the improvement score
const LEVEL_STEP: f32 = 0.1;

/// Outcome of reviewing an active design
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewDecision {
    /// Design is already packed on the fastest drive; not evaluated
    Skip,
    Keep,
    Obsolete {
        candidate: Blueprint,
        improvement: f32,
        /// Replace in the same slot this turn without a countdown
        replace_now: bool,
    },
}

/// Why a design left service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireReason {
    /// Little production is tied up in ships of this design
    CheapToReplace,
    CountdownExpired,
    /// No hostile neighbours to worry about while refitting
    NoHostiles,
    /// Colony ship no longer meets the colonization requirements
    RequirementsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    Retire(RetireReason),
    InstallInFreeSlot,
    Wait,
}

/// Inputs to one review of an obsolete-pending design
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingInputs {
    pub role: ShipRole,
    pub turns_left: u32,
    /// Unit cost times ships in service
    pub committed_value: f32,
    /// One turn of the faction's total production
    pub turn_production: f32,
    pub has_free_slot: bool,
    pub hostile_count: u32,
    /// A successor already holds the role in another slot
    pub successor_installed: bool,
}

/// Packed designs on the fastest known drive are left alone
pub fn is_packed(bp: &Blueprint, catalog: &ComponentCatalog, config: &DesignerConfig) -> bool {
    bp.warp() >= catalog.max_warp() && bp.free_fraction() < config.packed_free_fraction
}

/// How much better `candidate` is than `current`.
///
/// Combines speed, shield and attack levels, hit points and damage per cost.
/// Denominators are floored so a design with no weapons or hits still
/// yields a finite score.
pub fn improvement_score(candidate: &Blueprint, current: &Blueprint, config: &DesignerConfig) -> f32 {
    let speed = ((candidate.warp() as f32 + 1.0) / (current.warp() as f32 + 1.0)).sqrt();
    let shield = level_factor(candidate.shield_level(), current.shield_level());
    let attack = level_factor(candidate.attack_level(), current.attack_level());
    let hits = (candidate.hits() / current.hits().max(1.0)).sqrt();
    let damage = candidate.damage_per_cost() / current.damage_per_cost().max(config.min_damage_per_cost);
    speed * shield * attack * hits * damage
}

fn level_factor(candidate: u32, current: u32) -> f32 {
    (1.0 + LEVEL_STEP * (candidate as f32 - current as f32)).max(0.0)
}

pub fn exceeds_threshold(improvement: f32, at_war: bool, config: &DesignerConfig) -> bool {
    improvement >= config.upgrade_threshold(at_war)
}

/// Review the active design of a combat role
pub fn evaluate_combat(
    ctx: &FitContext<'_>,
    current: &Blueprint,
    at_war: bool,
    production_budget: f32,
) -> ReviewDecision {
    if is_packed(current, ctx.catalog, ctx.config) {
        return ReviewDecision::Skip;
    }

    let current = refreshed(ctx, current);
    let best = select_best(ctx, current.role, &current, production_budget);
    if best.is_active || best.blueprint.same_components(&current) {
        return ReviewDecision::Keep;
    }

    let improvement = improvement_score(&best.blueprint, &current, ctx.config);
    if !exceeds_threshold(improvement, at_war, ctx.config) {
        return ReviewDecision::Keep;
    }
    ReviewDecision::Obsolete {
        candidate: best.blueprint,
        improvement,
        replace_now: false,
    }
}

/// Scouts are replaced once a strictly faster drive is known
pub fn evaluate_scout(catalog: &ComponentCatalog, config: &DesignerConfig, current: &Blueprint) -> ReviewDecision {
    let candidate = fit_scout(catalog);
    if candidate.warp() > current.warp() {
        let improvement = improvement_score(&candidate, current, config);
        return ReviewDecision::Obsolete {
            candidate,
            improvement,
            replace_now: false,
        };
    }
    ReviewDecision::Keep
}

/// Colony ships follow the requirements first, then a faster drive.
///
/// A design that no longer meets the requirements is replaced in place, but
/// only once none of its ships are still in transit.
pub fn evaluate_colony(
    ctx: &FitContext<'_>,
    current: &Blueprint,
    requirements: ColonyRequirements,
    in_transit: u32,
) -> ReviewDecision {
    let candidate = fit_colony_ship(ctx, requirements);
    if !meets_requirements(current, &requirements) {
        if in_transit > 0 || !meets_requirements(&candidate, &requirements) {
            return ReviewDecision::Keep;
        }
        return ReviewDecision::Obsolete {
            candidate,
            improvement: 1.0,
            replace_now: true,
        };
    }

    if candidate.warp() > current.warp() {
        let improvement = improvement_score(&candidate, current, ctx.config);
        return ReviewDecision::Obsolete {
            candidate,
            improvement,
            replace_now: false,
        };
    }
    ReviewDecision::Keep
}

/// Decide what happens to an obsolete-pending design this turn.
///
/// Checks run in a fixed order: cheap to replace, countdown expired, free
/// slot for the successor, no hostiles. A design whose successor is already
/// in service only checks the first two.
pub fn review_pending(inputs: &PendingInputs, config: &DesignerConfig) -> PendingAction {
    let retire_below = config.retire_fraction(inputs.role) * inputs.turn_production;
    if inputs.committed_value < retire_below {
        return PendingAction::Retire(RetireReason::CheapToReplace);
    }
    if inputs.turns_left == 0 {
        return PendingAction::Retire(RetireReason::CountdownExpired);
    }
    if inputs.successor_installed {
        return PendingAction::Wait;
    }
    if inputs.has_free_slot {
        return PendingAction::InstallInFreeSlot;
    }
    if inputs.hostile_count == 0 {
        return PendingAction::Retire(RetireReason::NoHostiles);
    }
    PendingAction::Wait
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Component, ComponentCategory};
    use crate::core::types::HullSize;
    use crate::design::blueprint::ModuleSlot;

    fn pending(role: ShipRole) -> PendingInputs {
        PendingInputs {
            role,
            turns_left: 5,
            committed_value: 500.0,
            turn_production: 100.0,
            has_free_slot: false,
            hostile_count: 2,
            successor_installed: false,
        }
    }

    #[test]
    fn test_cheap_destroyer_retires_at_once() {
        let config = DesignerConfig::default();
        let inputs = PendingInputs { committed_value: 40.0, ..pending(ShipRole::Destroyer) };
        assert_eq!(review_pending(&inputs, &config), PendingAction::Retire(RetireReason::CheapToReplace));

        // The same value is not cheap for a fighter
        let inputs = PendingInputs { committed_value: 60.0, ..pending(ShipRole::Fighter) };
        assert_eq!(review_pending(&inputs, &config), PendingAction::Wait);
    }

    #[test]
    fn test_pending_check_order() {
        let config = DesignerConfig::default();
        let expired = PendingInputs { turns_left: 0, has_free_slot: true, ..pending(ShipRole::Bomber) };
        assert_eq!(review_pending(&expired, &config), PendingAction::Retire(RetireReason::CountdownExpired));

        let free = PendingInputs { has_free_slot: true, hostile_count: 0, ..pending(ShipRole::Bomber) };
        assert_eq!(review_pending(&free, &config), PendingAction::InstallInFreeSlot);

        let calm = PendingInputs { hostile_count: 0, ..pending(ShipRole::Bomber) };
        assert_eq!(review_pending(&calm, &config), PendingAction::Retire(RetireReason::NoHostiles));

        assert_eq!(review_pending(&pending(ShipRole::Bomber), &config), PendingAction::Wait);
    }

    #[test]
    fn test_superseded_design_only_checks_cost_and_countdown() {
        let config = DesignerConfig::default();
        let inputs = PendingInputs {
            successor_installed: true,
            has_free_slot: true,
            hostile_count: 0,
            ..pending(ShipRole::Fighter)
        };
        assert_eq!(review_pending(&inputs, &config), PendingAction::Wait);

        let expired = PendingInputs { turns_left: 0, ..inputs };
        assert_eq!(review_pending(&expired, &config), PendingAction::Retire(RetireReason::CountdownExpired));
    }

    #[test]
    fn test_thresholds() {
        let config = DesignerConfig::default();
        assert!(exceeds_threshold(1.3, false, &config));
        assert!(!exceeds_threshold(1.3, true, &config));
        assert!(exceeds_threshold(1.5, true, &config));
    }

    #[test]
    fn test_improvement_of_identical_designs_is_one() {
        let config = DesignerConfig::default();
        let mut bp = Blueprint::new(ShipRole::Fighter, HullSize::Small);
        bp.install(ModuleSlot::Engine, Component::engine("E", 1, 1, 10, 2.0));
        bp.ship_damage = 3.0;
        assert!((improvement_score(&bp, &bp, &config) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_improvement_rewards_speed_and_damage() {
        let config = DesignerConfig::default();
        let mut slow = Blueprint::new(ShipRole::Fighter, HullSize::Small);
        slow.install(ModuleSlot::Engine, Component::engine("Slow", 1, 1, 10, 2.0));
        slow.ship_damage = 3.0;

        let mut fast = slow.clone();
        fast.install(ModuleSlot::Engine, Component::engine("Fast", 2, 3, 10, 2.0));
        // sqrt(4 / 2) from speed alone
        let score = improvement_score(&fast, &slow, &config);
        assert!((score - 2.0_f32.sqrt()).abs() < 1e-5);

        // A weaponless design is floored, not divided by zero
        let unarmed = Blueprint::new(ShipRole::Fighter, HullSize::Small);
        assert!(improvement_score(&slow, &unarmed, &config).is_finite());
    }

    #[test]
    fn test_packed_design_skipped() {
        let catalog = ComponentCatalog::new(vec![Component::engine("Only", 1, 1, 10, 2.0)]);
        let config = DesignerConfig::default();
        let mut bp = Blueprint::new(ShipRole::Fighter, HullSize::Small);
        bp.install(ModuleSlot::Engine, catalog.components_of(ComponentCategory::Engine)[0].clone());
        bp.install(ModuleSlot::Armor, Component::armor("Plate", 1, 1.5, false, 26, 1.0));
        assert_eq!(bp.free_space(), 4);
        assert!(is_packed(&bp, &catalog, &config));

        bp.clear_module(ModuleSlot::Armor);
        assert!(!is_packed(&bp, &catalog, &config));
    }

    #[test]
    fn test_current_design_judged_against_todays_shields() {
        use crate::core::types::FactionId;
        use crate::design::fitter::fit;
        use crate::design::selector::score_candidates;
        use crate::faction::RaceProfile;
        use crate::rivals::{RivalAssessment, RivalView, TechProfile};

        let tree = ComponentCatalog::standard().unwrap();
        let early = tree.up_to_level(1);
        let later = tree.up_to_level(4);
        let race = RaceProfile::default();
        let config = DesignerConfig::default();

        let own = TechProfile::bare(FactionId(1));
        let calm = RivalAssessment::build(&own, &[], 3);
        let current = fit(&FitContext::new(&early, &race, &config, &calm), ShipRole::Fighter, HullSize::Small);
        assert!(current.ship_damage > 0.0);

        // Lasers average 2.5 and cannot get through a level 3 shield
        let rival = RivalView {
            faction: FactionId(2),
            relation: -100,
            tech: TechProfile { shield: 3, ..TechProfile::bare(FactionId(2)) },
        };
        let shielded = RivalAssessment::build(&own, &[rival], 3);
        let ctx = FitContext::new(&later, &race, &config, &shielded);
        assert_eq!(refreshed(&ctx, &current).ship_damage, 0.0);

        let candidates = score_candidates(&ctx, ShipRole::Fighter, &current, 500.0);
        let active = candidates.iter().find(|c| c.is_active).unwrap();
        assert_eq!(active.blueprint.ship_damage, 0.0);
        assert_eq!(active.score, 0.0);

        match evaluate_combat(&ctx, &current, true, 500.0) {
            ReviewDecision::Obsolete { candidate, .. } => assert!(candidate.ship_damage > 0.0),
            other => panic!("expected obsolete, got {:?}", other),
        }
    }

    #[test]
    fn test_scout_replaced_only_on_faster_drive() {
        let catalog = ComponentCatalog::standard().unwrap();
        let config = DesignerConfig::default();
        let current = fit_scout(&catalog);
        assert_eq!(evaluate_scout(&catalog, &config, &current), ReviewDecision::Keep);

        let early = fit_scout(&catalog.up_to_level(1));
        assert!(matches!(evaluate_scout(&catalog, &config, &early), ReviewDecision::Obsolete { replace_now: false, .. }));
    }
}
