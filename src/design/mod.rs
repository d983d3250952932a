//! Ship design: fitting, selection and the design slot lifecycle

pub mod blueprint;
pub mod civilian;
pub mod fitter;
pub mod obsolescence;
pub mod selector;
pub mod slots;
pub mod weapon_fit;

pub use blueprint::{Blueprint, ModuleSlot, WeaponSlot};
pub use civilian::{fit_colony_ship, fit_scout, ColonyRequirements};
pub use fitter::{fit, FitContext};
pub use obsolescence::{PendingAction, RetireReason, ReviewDecision};
pub use selector::{select_best, Candidate};
pub use slots::{DesignSlots, DesignStatus, SlotEntry};
