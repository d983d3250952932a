//! Property tests for fitting, selection and the slot lifecycle

use fleet_forge::catalog::ComponentCatalog;
use fleet_forge::core::types::{FactionId, HullSize, ShipRole};
use fleet_forge::core::DesignerConfig;
use fleet_forge::design::selector::{affordable_count, pick_best, score_candidates, Candidate};
use fleet_forge::design::{fit, Blueprint, FitContext};
use fleet_forge::faction::{Faction, RaceProfile, Relation};
use fleet_forge::rivals::{RivalAssessment, RivalView, TechProfile};
use fleet_forge::turn::{review_faction_designs_with, TurnInputs};
use proptest::prelude::*;

fn hull() -> impl Strategy<Value = HullSize> {
    prop::sample::select(HullSize::ALL.to_vec())
}

fn combat_role() -> impl Strategy<Value = ShipRole> {
    prop::sample::select(vec![ShipRole::Fighter, ShipRole::Bomber, ShipRole::Destroyer])
}

fn race(module_ratio: f32) -> RaceProfile {
    RaceProfile {
        module_ratio,
        ..RaceProfile::default()
    }
}

fn assessment(shield: u32, interdictor: bool, repulsor: bool) -> RivalAssessment {
    let view = RivalView {
        faction: FactionId(2),
        relation: -80,
        tech: TechProfile {
            shield,
            planetary_shield: shield * 2,
            interdictor,
            repulsor,
            ..TechProfile::bare(FactionId(2))
        },
    };
    RivalAssessment::build(&TechProfile::bare(FactionId(1)), &[view], 3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fitted_designs_never_exceed_capacity(
        role in combat_role(),
        hull in hull(),
        level in 1u32..=8,
        module_ratio in 0.0f32..1.0,
        shield in 0u32..=5,
        interdictor in any::<bool>(),
        repulsor in any::<bool>(),
    ) {
        let catalog = ComponentCatalog::standard().unwrap().up_to_level(level);
        let race = race(module_ratio);
        let config = DesignerConfig::default();
        let rivals = assessment(shield, interdictor, repulsor);
        let ctx = FitContext::new(&catalog, &race, &config, &rivals);

        let bp = fit(&ctx, role, hull);
        prop_assert!(bp.used_space() <= bp.capacity());
        prop_assert!(bp.ship_damage >= 0.0 && bp.colony_damage >= 0.0);
    }

    #[test]
    fn fitting_is_deterministic(role in combat_role(), hull in hull(), level in 1u32..=8) {
        let catalog = ComponentCatalog::standard().unwrap().up_to_level(level);
        let race = RaceProfile::default();
        let config = DesignerConfig::default();
        let rivals = assessment(2, false, false);
        let ctx = FitContext::new(&catalog, &race, &config, &rivals);

        let a = fit(&ctx, role, hull);
        let b = fit(&ctx, role, hull);
        prop_assert!(a.same_components(&b));
        prop_assert_eq!(a.ship_damage, b.ship_damage);
        prop_assert_eq!(a.colony_damage, b.colony_damage);
    }

    #[test]
    fn affordability_never_falls_as_budget_grows(
        budget in 0.0f32..10_000.0,
        extra in 0.0f32..10_000.0,
        cost in 0.0f32..2_000.0,
        size_multiplier in 0.01f32..4.0,
        inflation in 1.0f32..2.0,
    ) {
        let window = DesignerConfig::default().affordability_window;
        let low = affordable_count(budget, window, cost, size_multiplier, inflation);
        let high = affordable_count(budget + extra, window, cost, size_multiplier, inflation);
        prop_assert!(low <= high);
    }

    #[test]
    fn harmless_candidates_never_win(scores in prop::collection::vec(0.0f32..100.0, 1..6)) {
        let harmless = Candidate {
            blueprint: Blueprint::new(ShipRole::Fighter, HullSize::Huge),
            is_active: true,
            affordable: 10,
            score: 0.0,
        };
        let mut candidates = vec![harmless];
        for (i, score) in scores.iter().enumerate() {
            candidates.push(Candidate {
                blueprint: Blueprint::new(ShipRole::Fighter, HullSize::ALL[i % HullSize::ALL.len()]),
                is_active: false,
                affordable: 1,
                score: *score + 0.5,
            });
        }
        let best = pick_best(candidates).unwrap();
        prop_assert!(!best.is_active);
        prop_assert!(best.score > 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn candidate_scores_never_fall_as_budget_grows(
        role in combat_role(),
        level in 1u32..=8,
        budget in 0.0f32..3_000.0,
        extra in 0.0f32..3_000.0,
    ) {
        let catalog = ComponentCatalog::standard().unwrap().up_to_level(level);
        let race = RaceProfile::default();
        let config = DesignerConfig::default();
        let rivals = assessment(1, false, false);
        let ctx = FitContext::new(&catalog, &race, &config, &rivals);
        let active = fit(&ctx, role, HullSize::Small);

        let low = score_candidates(&ctx, role, &active, budget);
        let high = score_candidates(&ctx, role, &active, budget + extra);
        prop_assert_eq!(low.len(), high.len());
        for (a, b) in low.iter().zip(high.iter()) {
            prop_assert_eq!(a.blueprint.hull, b.blueprint.hull);
            prop_assert!(a.score <= b.score, "{:?}: {} > {}", a.blueprint.hull, a.score, b.score);
        }
    }

    #[test]
    fn one_current_design_per_role_every_turn(
        levels in prop::collection::vec(1u32..=8, 1..8),
        budgets in prop::collection::vec(0.0f32..2_000.0, 8),
        in_service in 0u32..200,
        at_war in any::<bool>(),
    ) {
        let config = DesignerConfig::default();
        let tree = ComponentCatalog::standard().unwrap();
        let mut faction = Faction::new(
            FactionId(1),
            "Test Dominion",
            RaceProfile::default(),
            tree.up_to_level(1),
            &config,
        )
        .unwrap();
        faction.set_relation(FactionId(2), Relation { opinion: -40, at_war });

        for (turn, &level) in levels.iter().enumerate() {
            faction.catalog = tree.up_to_level(level);
            let mut inputs = TurnInputs {
                turn: turn as u32,
                production_budget: budgets[turn % budgets.len()],
                turn_production: 100.0,
                ..TurnInputs::default()
            };
            for (_, entry) in faction.slots.entries() {
                inputs.in_service.insert(entry.blueprint.id, in_service);
            }

            review_faction_designs_with(&mut faction, &inputs, &config).unwrap();
            for role in ShipRole::REVIEW_ORDER {
                prop_assert_eq!(faction.slots.current_count(role), 1);
            }
            prop_assert!(faction.slots.entries().count() <= faction.slots.capacity());
        }
    }
}
