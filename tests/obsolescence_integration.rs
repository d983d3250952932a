//! Obsolescence and replacement integration tests

use fleet_forge::catalog::{Component, ComponentCatalog};
use fleet_forge::core::types::{FactionId, HullSize, ShipRole};
use fleet_forge::core::DesignerConfig;
use fleet_forge::catalog::{WeaponClass, WeaponProfile};
use fleet_forge::design::obsolescence::{
    evaluate_combat, exceeds_threshold, improvement_score, is_packed, review_pending, PendingInputs,
};
use fleet_forge::design::{
    fit, Blueprint, DesignStatus, FitContext, ModuleSlot, PendingAction, RetireReason, ReviewDecision,
};
use fleet_forge::rivals::{RivalAssessment, TechProfile};
use fleet_forge::faction::{Faction, RaceProfile, Relation};
use fleet_forge::turn::{review_faction_designs_with, DesignEvent, TurnInputs};

fn human() -> RaceProfile {
    RaceProfile {
        name: "human".to_string(),
        ..RaceProfile::default()
    }
}

fn faction_at(level: u32) -> Faction {
    let catalog = ComponentCatalog::standard().unwrap().up_to_level(level);
    Faction::new(FactionId(1), "Terran League", human(), catalog, &DesignerConfig::default()).unwrap()
}

fn inputs(turn: u32, budget: f32, production: f32) -> TurnInputs {
    TurnInputs {
        turn,
        production_budget: budget,
        turn_production: production,
        ..TurnInputs::default()
    }
}

#[test]
fn test_packed_design_on_fastest_drive_is_not_reviewed() {
    let config = DesignerConfig::default();
    let engine = Component::engine("Nuclear Drive", 1, 1, 10, 2.0);
    let mut f = faction_at(1);

    // 36 of 40 spaces used leaves 10% free
    let mut packed = Blueprint::new(ShipRole::Fighter, HullSize::Small);
    packed.install(ModuleSlot::Engine, engine.clone());
    packed.install(ModuleSlot::Armor, Component::armor("Titanium", 1, 1.5, false, 26, 1.0));
    assert!((packed.free_fraction() - 0.1).abs() < 1e-6);

    let index = f.slots.current_index(ShipRole::Fighter).unwrap();
    f.slots.replace_in_place(index, packed).unwrap();
    f.catalog = ComponentCatalog::new(vec![engine]);
    let before = f.current_design(ShipRole::Fighter).unwrap().id;
    assert!(is_packed(f.current_design(ShipRole::Fighter).unwrap(), &f.catalog, &config));

    let report = review_faction_designs_with(&mut f, &inputs(1, 500.0, 100.0), &config).unwrap();
    let fighter = report.role(ShipRole::Fighter).unwrap();
    assert!(fighter.skipped);
    assert!(!fighter.changed);
    assert!(fighter.events.is_empty());
    assert_eq!(f.current_design(ShipRole::Fighter).unwrap().id, before);
}

fn armed_fighter(damage: f32) -> Blueprint {
    let mut bp = Blueprint::new(ShipRole::Fighter, HullSize::Small);
    bp.install(ModuleSlot::Engine, Component::engine("Nuclear Drive", 1, 1, 10, 2.0));
    bp.ship_damage = damage;
    bp
}

#[test]
fn test_peacetime_upgrade_at_moderate_improvement() {
    let config = DesignerConfig::default();
    let current = armed_fighter(10.0);
    let candidate = armed_fighter(13.0);
    let improvement = improvement_score(&candidate, &current, &config);
    assert!((improvement - 1.3).abs() < 1e-4);
    assert!(exceeds_threshold(improvement, false, &config));
}

#[test]
fn test_wartime_holds_design_at_moderate_improvement() {
    let config = DesignerConfig::default();
    let current = armed_fighter(10.0);
    let candidate = armed_fighter(13.0);
    let improvement = improvement_score(&candidate, &current, &config);
    assert!(!exceeds_threshold(improvement, true, &config));
}

/// A current fighter that is the fresh fit plus a costly jammer the improvement
/// score ignores, so the fresh fit is 1.30 times better per unit of cost
fn overpriced_fighter_review(at_war: bool) -> ReviewDecision {
    let laser = WeaponProfile {
        class: WeaponClass::Beam,
        damage_min: 1.0,
        damage_max: 5.0,
        attacks: 1,
        range: 1,
        halves_shields: false,
    };
    let catalog = ComponentCatalog::new(vec![
        Component::engine("Nuclear Engine", 1, 1, 10, 2.0),
        Component::weapon_of("Laser", 1, laser, 10, 3.0),
    ]);
    // Only the small hull is affordable
    let race = RaceProfile {
        size_cost_multiplier: [1.0, 1000.0, 1000.0, 1000.0],
        ..human()
    };
    let config = DesignerConfig::default();
    let rivals = RivalAssessment::build(&TechProfile::bare(FactionId(1)), &[], 3);
    let ctx = FitContext::new(&catalog, &race, &config, &rivals);

    // Engine 2 + hull 6 + two lasers 6 = 14; the jammer lifts it to 18.2
    let mut current = fit(&ctx, ShipRole::Fighter, HullSize::Small);
    assert!((current.cost() - 14.0).abs() < 1e-4);
    current.install(ModuleSlot::Ecm, Component::ecm("Gilded Jammer", 1, 1, 0, 4.2));

    evaluate_combat(&ctx, &current, at_war, 500.0)
}

#[test]
fn test_moderate_improvement_upgrades_in_peacetime() {
    match overpriced_fighter_review(false) {
        ReviewDecision::Obsolete { candidate, improvement, replace_now } => {
            assert!((improvement - 1.3).abs() < 1e-3);
            assert!(!replace_now);
            assert_eq!(candidate.hull, HullSize::Small);
        }
        other => panic!("expected an upgrade, got {:?}", other),
    }
}

#[test]
fn test_moderate_improvement_held_in_wartime() {
    assert_eq!(overpriced_fighter_review(true), ReviewDecision::Keep);
}

#[test]
fn test_cheap_obsolete_destroyer_retires_regardless_of_countdown() {
    let config = DesignerConfig::default();
    let pending = PendingInputs {
        role: ShipRole::Destroyer,
        turns_left: config.countdown(ShipRole::Destroyer),
        committed_value: 40.0,
        turn_production: 100.0,
        has_free_slot: true,
        hostile_count: 3,
        successor_installed: false,
    };
    assert_eq!(
        review_pending(&pending, &config),
        PendingAction::Retire(RetireReason::CheapToReplace)
    );
}

#[test]
fn test_destroyer_fleet_worth_less_than_a_turn_is_replaced_at_once() {
    let config = DesignerConfig::default();
    let mut f = faction_at(1);
    f.set_relation(FactionId(2), Relation { opinion: -90, at_war: true });

    let old = f.current_design(ShipRole::Destroyer).unwrap().clone();
    let mut input = inputs(1, 600.0, 0.0);
    input.in_service.insert(old.id, 4);
    // Committed value is 0.4 of one turn's production
    input.turn_production = old.cost() * 4.0 / 0.4;

    f.catalog = ComponentCatalog::standard().unwrap().up_to_level(8);
    let report = review_faction_designs_with(&mut f, &input, &config).unwrap();
    let destroyer = report.role(ShipRole::Destroyer).unwrap();

    assert!(destroyer.changed);
    assert!(destroyer.events.contains(&DesignEvent::Retired {
        design: old.id,
        reason: RetireReason::CheapToReplace,
    }));
    assert!(f.slots.find(old.id).is_none());
    assert_eq!(f.slots.current_count(ShipRole::Destroyer), 1);
}

#[test]
fn test_expensive_fleet_waits_then_successor_takes_free_slot() {
    let config = DesignerConfig::default();
    let mut f = faction_at(1);
    f.set_relation(FactionId(2), Relation { opinion: -90, at_war: true });

    let old = f.current_design(ShipRole::Fighter).unwrap().clone();
    let mut input = inputs(1, 600.0, 10.0);
    input.in_service.insert(old.id, 1000);

    f.catalog = ComponentCatalog::standard().unwrap().up_to_level(8);
    review_faction_designs_with(&mut f, &input, &config).unwrap();

    // The old design keeps flying while a successor holds the role
    let entry = f.slots.find(old.id).expect("old fighter still in a slot");
    assert!(matches!(entry.status, DesignStatus::ObsoletePending { .. }));
    let successor = entry.successor.expect("successor installed");
    assert_eq!(f.current_design(ShipRole::Fighter).unwrap().id, successor);
    assert_eq!(f.slots.current_count(ShipRole::Fighter), 1);

    // Countdown runs out and the old design leaves
    for turn in 2..(config.countdown(ShipRole::Fighter) + 3) {
        let mut input = inputs(turn, 600.0, 10.0);
        input.in_service.insert(old.id, 1000);
        review_faction_designs_with(&mut f, &input, &config).unwrap();
    }
    assert!(f.slots.find(old.id).is_none());
    assert_eq!(f.current_design(ShipRole::Fighter).unwrap().id, successor);
}

#[test]
fn test_colony_ship_waits_for_transit_before_requirement_change() {
    let config = DesignerConfig::default();
    let mut f = faction_at(3);
    let old = f.current_design(ShipRole::Colony).unwrap().clone();
    assert_eq!(old.weapon_total(), 0);

    let mut input = inputs(1, 300.0, 100.0);
    input.colony_requirements.armed = true;
    input.in_transit.insert(old.id, 2);
    let report = review_faction_designs_with(&mut f, &input, &config).unwrap();
    assert!(!report.role(ShipRole::Colony).unwrap().changed);

    input.in_transit.clear();
    let report = review_faction_designs_with(&mut f, &input, &config).unwrap();
    let colony = report.role(ShipRole::Colony).unwrap();
    assert!(colony.changed);
    assert!(colony.events.contains(&DesignEvent::Retired {
        design: old.id,
        reason: RetireReason::RequirementsChanged,
    }));
    assert!(f.current_design(ShipRole::Colony).unwrap().weapon_total() > 0);
}
