use thiserror::Error;

use crate::core::types::ShipRole;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("No design registered for role {0:?}")]
    MissingRoleDesign(ShipRole),

    #[error("Design slot pool holds {capacity} slots but {required} are required")]
    SlotPoolTooSmall { capacity: usize, required: usize },

    #[error("Design slot {0} is empty or out of range")]
    InvalidSlot(usize),

    #[error("No free design slot")]
    NoFreeSlot,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DesignError>;
