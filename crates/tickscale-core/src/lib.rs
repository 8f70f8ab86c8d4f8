pub mod config;
pub mod types;

pub use config::{ConfigError, ScalerConfig, TickscaleConfig};
pub use types::*;
