//! Candidate selector - picks the best design for a role this turn
//!
//! One fresh fit per hull size competes with the design already in service.
//! Scores weigh how many of a design the faction can afford against the
//! damage each one does, adjusted for speed relative to the active design.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::DesignerConfig;
use crate::core::types::{HullSize, ShipRole};
use crate::design::blueprint::Blueprint;
use crate::design::fitter::{fit, FitContext};
use crate::faction::RaceProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub blueprint: Blueprint,
    pub is_active: bool,
    pub affordable: u32,
    pub score: f32,
}

/// Units buildable within the budget window; fewer than one counts as none
pub fn affordable_count(budget: f32, window: f32, cost: f32, size_multiplier: f32, inflation: f32) -> u32 {
    let unit = cost * size_multiplier * inflation;
    if unit <= 0.0 || budget <= 0.0 {
        return 0;
    }
    let count = (window * budget / unit).floor();
    if count < 1.0 {
        0
    } else {
        count as u32
    }
}

pub fn speed_factor(speed: u32, active_speed: u32) -> f32 {
    ((speed as f32 + 1.0) / (active_speed as f32 + 1.0)).sqrt()
}

fn score(
    blueprint: Blueprint,
    is_active: bool,
    active_speed: u32,
    race: &RaceProfile,
    config: &DesignerConfig,
    budget: f32,
) -> Candidate {
    let inflation = if is_active { config.active_cost_inflation } else { 1.0 };
    let affordable = affordable_count(
        budget,
        config.affordability_window,
        blueprint.cost(),
        race.size_cost_multiplier(blueprint.hull),
        inflation,
    );
    let score = affordable as f32 * blueprint.per_turn_damage() * speed_factor(blueprint.warp(), active_speed);
    Candidate {
        blueprint,
        is_active,
        affordable,
        score,
    }
}

/// Copy of a design with its damage estimates taken against this turn's targets
pub fn refreshed(ctx: &FitContext<'_>, design: &Blueprint) -> Blueprint {
    let mut bp = design.clone();
    bp.estimate_damage(ctx.ship_targets, ctx.colony_targets);
    bp
}

/// Score the active design and a fresh fit on every hull.
///
/// The active design comes first, then hulls from largest to smallest.
pub fn score_candidates(ctx: &FitContext<'_>, role: ShipRole, active: &Blueprint, budget: f32) -> Vec<Candidate> {
    let active_speed = active.warp();
    let mut candidates = Vec::with_capacity(HullSize::ALL.len() + 1);
    candidates.push(score(refreshed(ctx, active), true, active_speed, ctx.race, ctx.config, budget));
    for hull in HullSize::ALL.into_iter().rev() {
        let fitted = fit(ctx, role, hull);
        candidates.push(score(fitted, false, active_speed, ctx.race, ctx.config, budget));
    }
    candidates
}

/// Highest score wins; only a strictly greater score displaces an earlier
/// candidate, so ties go to the active design and then to larger hulls
pub fn pick_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        let better = best
            .as_ref()
            .map_or(true, |b| OrderedFloat(candidate.score) > OrderedFloat(b.score));
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Best design for a combat role this turn
pub fn select_best(ctx: &FitContext<'_>, role: ShipRole, active: &Blueprint, budget: f32) -> Candidate {
    let candidates = score_candidates(ctx, role, active, budget);
    for c in &candidates {
        debug!(
            "{} candidate {:?}{}: affordable {}, score {:.3}",
            role.name(),
            c.blueprint.hull,
            if c.is_active { " (active)" } else { "" },
            c.affordable,
            c.score
        );
    }

    match pick_best(candidates) {
        Some(best) => best,
        None => Candidate {
            blueprint: active.clone(),
            is_active: true,
            affordable: 0,
            score: 0.0,
        },
    }
}

/// Fresh design to take over from an outgoing one.
///
/// Only fresh fits compete. With nothing affordable the outgoing hull is
/// refitted rather than jumping to the largest hull.
pub fn select_replacement(ctx: &FitContext<'_>, outgoing: &Blueprint, budget: f32) -> Blueprint {
    let fresh: Vec<Candidate> = score_candidates(ctx, outgoing.role, outgoing, budget)
        .into_iter()
        .filter(|c| !c.is_active)
        .collect();
    match pick_best(fresh) {
        Some(best) if best.score > 0.0 => best.blueprint,
        _ => fit(ctx, outgoing.role, outgoing.hull),
    }
}
