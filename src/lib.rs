//! Fleet Forge - automated warship design and upgrade engine
//!
//! Computer-controlled factions use this crate to fit ship designs from
//! their researched components, score them against the rivals they fear
//! most, and decide when a fielded design should be replaced.

pub mod catalog;
pub mod core;
pub mod design;
pub mod faction;
pub mod rivals;
pub mod sim;
pub mod turn;

pub use crate::core::{DesignError, DesignerConfig, Result};
pub use crate::design::{Blueprint, ColonyRequirements, DesignSlots};
pub use crate::faction::Faction;
pub use crate::turn::{review_faction_designs, review_faction_designs_with, TurnInputs, TurnReport};
