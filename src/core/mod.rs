pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, DesignerConfig};
pub use error::{DesignError, Result};
