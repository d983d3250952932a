//! Design slot pool
//!
//! A faction keeps a small fixed number of design slots. Every role always has
//! exactly one current design: the active one, or an obsolete one that is
//! still waiting for its successor. Spare slots let a successor go into
//! service while the design it replaces is still flying.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{DesignError, Result};
use crate::core::types::{DesignId, ShipRole};
use crate::design::blueprint::Blueprint;

/// Lifecycle of a design in a slot; a retired design leaves its slot empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignStatus {
    /// Fielded and eligible for new build orders
    Active,
    /// Still fielded, no new orders, counting down to retirement
    ObsoletePending { turns_left: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEntry {
    pub blueprint: Blueprint,
    pub status: DesignStatus,
    /// Design that took over the role while this one is still pending
    pub successor: Option<DesignId>,
}

impl SlotEntry {
    fn active(blueprint: Blueprint) -> Self {
        Self {
            blueprint,
            status: DesignStatus::Active,
            successor: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DesignStatus::Active
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, DesignStatus::ObsoletePending { .. })
    }

    pub fn turns_left(&self) -> Option<u32> {
        match self.status {
            DesignStatus::ObsoletePending { turns_left } => Some(turns_left),
            DesignStatus::Active => None,
        }
    }

    /// The role's current design: active, or pending with no successor yet
    pub fn is_current(&self) -> bool {
        self.is_active() || (self.is_pending() && self.successor.is_none())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSlots {
    slots: Vec<Option<SlotEntry>>,
    /// Prefix for generated design names
    prefix: String,
    next_id: u32,
    marks: AHashMap<ShipRole, u32>,
}

impl DesignSlots {
    /// Create a pool with one initial design per role
    pub fn new(capacity: usize, prefix: &str, initial: Vec<Blueprint>) -> Result<Self> {
        let required = ShipRole::REVIEW_ORDER.len().max(initial.len());
        if capacity < required {
            return Err(DesignError::SlotPoolTooSmall { capacity, required });
        }
        for role in ShipRole::REVIEW_ORDER {
            if initial.iter().filter(|bp| bp.role == role).count() != 1 {
                return Err(DesignError::MissingRoleDesign(role));
            }
        }

        let mut pool = Self {
            slots: vec![None; capacity],
            prefix: prefix.to_string(),
            next_id: 1,
            marks: AHashMap::new(),
        };
        for (index, bp) in initial.into_iter().enumerate() {
            let bp = pool.register(bp);
            pool.slots[index] = Some(SlotEntry::active(bp));
        }
        Ok(pool)
    }

    /// Assign a fresh id and name
    fn register(&mut self, mut bp: Blueprint) -> Blueprint {
        let mark = self.marks.entry(bp.role).or_insert(0);
        *mark += 1;
        bp.id = DesignId(self.next_id);
        bp.name = format!("{} {} Mk {}", self.prefix, bp.role.name(), mark);
        self.next_id += 1;
        bp
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn entry(&self, index: usize) -> Option<&SlotEntry> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SlotEntry> {
        self.slots
            .get_mut(index)
            .and_then(|s| s.as_mut())
            .ok_or(DesignError::InvalidSlot(index))
    }

    /// Occupied slots with their indices
    pub fn entries(&self) -> impl Iterator<Item = (usize, &SlotEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    pub fn current_index(&self, role: ShipRole) -> Option<usize> {
        self.entries()
            .filter(|(_, e)| e.blueprint.role == role)
            .find(|(_, e)| e.is_active())
            .or_else(|| {
                self.entries()
                    .find(|(_, e)| e.blueprint.role == role && e.is_current())
            })
            .map(|(i, _)| i)
    }

    pub fn current(&self, role: ShipRole) -> Option<&Blueprint> {
        self.current_index(role)
            .and_then(|i| self.entry(i))
            .map(|e| &e.blueprint)
    }

    /// Pending designs of a role whose successor is already in service
    pub fn superseded(&self, role: ShipRole) -> Vec<usize> {
        self.entries()
            .filter(|(_, e)| e.blueprint.role == role && e.is_pending() && e.successor.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    pub fn has_free_slot(&self) -> bool {
        self.free_slot().is_some()
    }

    pub fn find(&self, id: DesignId) -> Option<&SlotEntry> {
        self.entries().map(|(_, e)| e).find(|e| e.blueprint.id == id)
    }

    /// Move an active design to obsolete-pending
    pub fn mark_obsolete(&mut self, index: usize, turns_left: u32) -> Result<()> {
        let entry = self.entry_mut(index)?;
        entry.status = DesignStatus::ObsoletePending { turns_left };
        Ok(())
    }

    /// Count a pending design down one turn; returns the turns left
    pub fn tick(&mut self, index: usize) -> Result<u32> {
        let entry = self.entry_mut(index)?;
        match entry.status {
            DesignStatus::ObsoletePending { turns_left } => {
                let turns_left = turns_left.saturating_sub(1);
                entry.status = DesignStatus::ObsoletePending { turns_left };
                Ok(turns_left)
            }
            DesignStatus::Active => Err(DesignError::InvalidSlot(index)),
        }
    }

    /// Retire the design in a slot and put a new active design in its place.
    /// Returns the retired blueprint.
    pub fn replace_in_place(&mut self, index: usize, candidate: Blueprint) -> Result<Blueprint> {
        let bp = self.register(candidate);
        let entry = self.entry_mut(index)?;
        let retired = std::mem::replace(entry, SlotEntry::active(bp));
        Ok(retired.blueprint)
    }

    /// Put a successor into a free slot, leaving the pending design flying.
    /// Returns the free slot used.
    pub fn install_successor(&mut self, pending: usize, candidate: Blueprint) -> Result<usize> {
        let free = self.free_slot().ok_or(DesignError::NoFreeSlot)?;
        self.entry(pending).ok_or(DesignError::InvalidSlot(pending))?;

        let bp = self.register(candidate);
        let id = bp.id;
        self.slots[free] = Some(SlotEntry::active(bp));
        self.entry_mut(pending)?.successor = Some(id);
        Ok(free)
    }

    /// Empty a slot; returns what it held
    pub fn vacate(&mut self, index: usize) -> Result<Blueprint> {
        self.slots
            .get_mut(index)
            .and_then(|s| s.take())
            .map(|e| e.blueprint)
            .ok_or(DesignError::InvalidSlot(index))
    }

    /// Number of current designs for a role; always one in a consistent pool
    pub fn current_count(&self, role: ShipRole) -> usize {
        let active = self
            .entries()
            .filter(|(_, e)| e.blueprint.role == role && e.is_active())
            .count();
        if active > 0 {
            return active;
        }
        self.entries()
            .filter(|(_, e)| e.blueprint.role == role && e.is_current())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HullSize;

    fn initial() -> Vec<Blueprint> {
        ShipRole::REVIEW_ORDER
            .iter()
            .map(|&role| Blueprint::new(role, HullSize::Small))
            .collect()
    }

    #[test]
    fn test_new_pool_names_and_ids() {
        let pool = DesignSlots::new(6, "Human", initial()).unwrap();
        let fighter = pool.current(ShipRole::Fighter).unwrap();
        assert_eq!(fighter.name, "Human Fighter Mk 1");
        assert_eq!(fighter.id, DesignId(1));
        assert_eq!(pool.free_slot(), Some(5));
    }

    #[test]
    fn test_pool_too_small() {
        assert!(matches!(
            DesignSlots::new(4, "Human", initial()),
            Err(DesignError::SlotPoolTooSmall { capacity: 4, required: 5 })
        ));
    }

    #[test]
    fn test_missing_role_rejected() {
        let mut designs = initial();
        designs.pop();
        assert!(matches!(
            DesignSlots::new(6, "Human", designs),
            Err(DesignError::MissingRoleDesign(ShipRole::Colony))
        ));
    }

    #[test]
    fn test_successor_takes_over_current() {
        let mut pool = DesignSlots::new(6, "Human", initial()).unwrap();
        let index = pool.current_index(ShipRole::Bomber).unwrap();
        pool.mark_obsolete(index, 9).unwrap();
        assert_eq!(pool.current_index(ShipRole::Bomber), Some(index));

        let slot = pool
            .install_successor(index, Blueprint::new(ShipRole::Bomber, HullSize::Medium))
            .unwrap();
        assert_eq!(pool.current_index(ShipRole::Bomber), Some(slot));
        assert_eq!(pool.current(ShipRole::Bomber).unwrap().name, "Human Bomber Mk 2");
        assert_eq!(pool.superseded(ShipRole::Bomber), vec![index]);
        assert_eq!(pool.current_count(ShipRole::Bomber), 1);
        assert!(!pool.has_free_slot());

        assert!(matches!(
            pool.install_successor(index, Blueprint::new(ShipRole::Bomber, HullSize::Large)),
            Err(DesignError::NoFreeSlot)
        ));
    }

    #[test]
    fn test_replace_in_place_and_tick() {
        let mut pool = DesignSlots::new(6, "Human", initial()).unwrap();
        let index = pool.current_index(ShipRole::Destroyer).unwrap();
        pool.mark_obsolete(index, 2).unwrap();
        assert_eq!(pool.tick(index).unwrap(), 1);
        assert_eq!(pool.tick(index).unwrap(), 0);
        assert_eq!(pool.tick(index).unwrap(), 0);

        let retired = pool
            .replace_in_place(index, Blueprint::new(ShipRole::Destroyer, HullSize::Large))
            .unwrap();
        assert_eq!(retired.name, "Human Destroyer Mk 1");
        let entry = pool.entry(index).unwrap();
        assert!(entry.is_active());
        assert_eq!(entry.blueprint.hull, HullSize::Large);
    }

    #[test]
    fn test_vacate_empty_slot_is_error() {
        let mut pool = DesignSlots::new(6, "Human", initial()).unwrap();
        assert!(matches!(pool.vacate(5), Err(DesignError::InvalidSlot(5))));
        assert!(pool.vacate(0).is_ok());
        assert!(pool.vacate(0).is_err());
    }
}
