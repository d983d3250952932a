//! Per-turn design review for one faction
//!
//! Roles are reviewed in a fixed order so that slot availability seen by a
//! later role already reflects what earlier roles did this turn.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::{config, DesignerConfig};
use crate::core::error::{DesignError, Result};
use crate::core::types::{DesignId, FactionId, HullSize, ShipRole, Turn};
use crate::design::blueprint::Blueprint;
use crate::design::civilian::{fit_colony_ship, fit_scout, ColonyRequirements};
use crate::design::fitter::FitContext;
use crate::design::obsolescence::{
    evaluate_colony, evaluate_combat, evaluate_scout, review_pending, PendingAction, PendingInputs, RetireReason,
    ReviewDecision,
};
use crate::design::selector::select_replacement;
use crate::design::slots::{DesignSlots, DesignStatus};
use crate::faction::Faction;

/// Host-provided state for one review
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TurnInputs {
    pub turn: Turn,
    /// Production the faction can put toward new ships
    pub production_budget: f32,
    /// One turn of the faction's total production
    pub turn_production: f32,
    /// Ships in service per design
    pub in_service: AHashMap<DesignId, u32>,
    /// Ships built but not yet arrived, per design
    pub in_transit: AHashMap<DesignId, u32>,
    pub colony_requirements: ColonyRequirements,
}

impl TurnInputs {
    pub fn in_service(&self, design: DesignId) -> u32 {
        self.in_service.get(&design).copied().unwrap_or(0)
    }

    pub fn in_transit(&self, design: DesignId) -> u32 {
        self.in_transit.get(&design).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DesignEvent {
    Obsoleted { design: DesignId, turns_left: u32, improvement: f32 },
    Retired { design: DesignId, reason: RetireReason },
    Installed { design: DesignId, name: String, hull: HullSize, slot: usize },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleReport {
    pub role: ShipRole,
    /// Design was packed on the fastest drive and not evaluated
    pub skipped: bool,
    /// The role's current design is a different design than at turn start
    pub changed: bool,
    pub current: Option<DesignId>,
    pub events: Vec<DesignEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnReport {
    pub faction: FactionId,
    pub turn: Turn,
    pub roles: Vec<RoleReport>,
}

impl TurnReport {
    pub fn changed(&self) -> bool {
        self.roles.iter().any(|r| r.changed)
    }

    pub fn role(&self, role: ShipRole) -> Option<&RoleReport> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn events(&self) -> impl Iterator<Item = &DesignEvent> {
        self.roles.iter().flat_map(|r| r.events.iter())
    }
}

/// Review every role of a faction with the global config
pub fn review_faction_designs(faction: &mut Faction, inputs: &TurnInputs) -> Result<TurnReport> {
    review_faction_designs_with(faction, inputs, config())
}

pub fn review_faction_designs_with(
    faction: &mut Faction,
    inputs: &TurnInputs,
    config: &DesignerConfig,
) -> Result<TurnReport> {
    let assessment = faction.assessment(config);
    let outlook = Outlook {
        at_war: faction.at_war(),
        hostile_count: faction.hostile_count(config),
    };
    let faction_id = faction.id;

    let Faction {
        ref catalog,
        ref race,
        ref mut slots,
        ..
    } = *faction;
    let ctx = FitContext::new(catalog, race, config, &assessment);

    let mut roles = Vec::with_capacity(ShipRole::REVIEW_ORDER.len());
    for role in ShipRole::REVIEW_ORDER {
        let report = review_role(&ctx, slots, role, inputs, outlook)?;
        debug_assert_eq!(slots.current_count(role), 1, "{:?} must have one current design", role);
        if report.changed {
            info!(
                "Faction {} turn {}: new {} design {:?}",
                faction_id.0, inputs.turn, role.name(), report.current
            );
        }
        roles.push(report);
    }

    Ok(TurnReport {
        faction: faction_id,
        turn: inputs.turn,
        roles,
    })
}

#[derive(Clone, Copy, Debug)]
struct Outlook {
    at_war: bool,
    hostile_count: u32,
}

fn review_role(
    ctx: &FitContext<'_>,
    slots: &mut DesignSlots,
    role: ShipRole,
    inputs: &TurnInputs,
    outlook: Outlook,
) -> Result<RoleReport> {
    let before = slots.current(role).map(|bp| bp.id);
    let mut events = Vec::new();
    let mut skipped = false;

    // Designs already superseded only wait to leave service
    for index in slots.superseded(role) {
        let turns_left = slots.tick(index)?;
        let blueprint = &slots.entry(index).ok_or(DesignError::InvalidSlot(index))?.blueprint;
        let pending = PendingInputs {
            role,
            turns_left,
            committed_value: committed_value(blueprint, inputs),
            turn_production: inputs.turn_production,
            has_free_slot: slots.has_free_slot(),
            hostile_count: outlook.hostile_count,
            successor_installed: true,
        };
        if let PendingAction::Retire(reason) = review_pending(&pending, ctx.config) {
            let retired = slots.vacate(index)?;
            events.push(DesignEvent::Retired { design: retired.id, reason });
        }
    }

    let index = slots.current_index(role).ok_or(DesignError::MissingRoleDesign(role))?;
    let entry = slots.entry(index).ok_or(DesignError::InvalidSlot(index))?.clone();

    match entry.status {
        DesignStatus::Active => {
            let decision = match role {
                ShipRole::Scout => evaluate_scout(ctx.catalog, ctx.config, &entry.blueprint),
                ShipRole::Colony => evaluate_colony(
                    ctx,
                    &entry.blueprint,
                    inputs.colony_requirements,
                    inputs.in_transit(entry.blueprint.id),
                ),
                ShipRole::Fighter | ShipRole::Bomber | ShipRole::Destroyer => {
                    evaluate_combat(ctx, &entry.blueprint, outlook.at_war, inputs.production_budget)
                }
            };

            match decision {
                ReviewDecision::Skip => skipped = true,
                ReviewDecision::Keep => {}
                ReviewDecision::Obsolete { candidate, replace_now: true, .. } => {
                    let retired = slots.replace_in_place(index, candidate)?;
                    events.push(DesignEvent::Retired {
                        design: retired.id,
                        reason: RetireReason::RequirementsChanged,
                    });
                    events.push(installed(slots, index)?);
                }
                ReviewDecision::Obsolete { candidate, improvement, replace_now: false } => {
                    let turns_left = ctx.config.countdown(role);
                    slots.mark_obsolete(index, turns_left)?;
                    debug!("{} obsolete, improvement {:.2}", entry.blueprint.name, improvement);
                    events.push(DesignEvent::Obsoleted {
                        design: entry.blueprint.id,
                        turns_left,
                        improvement,
                    });
                    resolve_pending(ctx, slots, index, candidate, turns_left, inputs, outlook, &mut events)?;
                }
            }
        }
        DesignStatus::ObsoletePending { .. } => {
            let turns_left = slots.tick(index)?;
            let candidate = replacement(ctx, &entry.blueprint, inputs);
            resolve_pending(ctx, slots, index, candidate, turns_left, inputs, outlook, &mut events)?;
        }
    }

    let current = slots.current(role).map(|bp| bp.id);
    Ok(RoleReport {
        role,
        skipped,
        changed: current != before,
        current,
        events,
    })
}

/// Apply the pending-design checks to the role's current design
#[allow(clippy::too_many_arguments)]
fn resolve_pending(
    ctx: &FitContext<'_>,
    slots: &mut DesignSlots,
    index: usize,
    candidate: Blueprint,
    turns_left: u32,
    inputs: &TurnInputs,
    outlook: Outlook,
    events: &mut Vec<DesignEvent>,
) -> Result<()> {
    let blueprint = &slots.entry(index).ok_or(DesignError::InvalidSlot(index))?.blueprint;
    let pending = PendingInputs {
        role: blueprint.role,
        turns_left,
        committed_value: committed_value(blueprint, inputs),
        turn_production: inputs.turn_production,
        has_free_slot: slots.has_free_slot(),
        hostile_count: outlook.hostile_count,
        successor_installed: false,
    };

    match review_pending(&pending, ctx.config) {
        PendingAction::Retire(reason) => {
            let retired = slots.replace_in_place(index, candidate)?;
            events.push(DesignEvent::Retired { design: retired.id, reason });
            events.push(installed(slots, index)?);
        }
        PendingAction::InstallInFreeSlot => {
            let slot = slots.install_successor(index, candidate)?;
            events.push(installed(slots, slot)?);
        }
        PendingAction::Wait => {}
    }
    Ok(())
}

/// Fresh design to take over from a pending one
fn replacement(ctx: &FitContext<'_>, outgoing: &Blueprint, inputs: &TurnInputs) -> Blueprint {
    match outgoing.role {
        ShipRole::Scout => fit_scout(ctx.catalog),
        ShipRole::Colony => fit_colony_ship(ctx, inputs.colony_requirements),
        ShipRole::Fighter | ShipRole::Bomber | ShipRole::Destroyer => {
            select_replacement(ctx, outgoing, inputs.production_budget)
        }
    }
}

fn committed_value(blueprint: &Blueprint, inputs: &TurnInputs) -> f32 {
    blueprint.cost() * inputs.in_service(blueprint.id) as f32
}

fn installed(slots: &DesignSlots, index: usize) -> Result<DesignEvent> {
    let bp = &slots.entry(index).ok_or(DesignError::InvalidSlot(index))?.blueprint;
    Ok(DesignEvent::Installed {
        design: bp.id,
        name: bp.name.clone(),
        hull: bp.hull,
        slot: index,
    })
}
