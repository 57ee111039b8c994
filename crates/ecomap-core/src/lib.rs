//! Shared domain model and configuration for the ecomap workspace.

pub mod app_config;
pub mod config;
pub mod filter;
pub mod lifecycle;
pub mod poi;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{ActiveFilterSet, Selection};
pub use lifecycle::{InputVersion, MountGuard};
pub use poi::{Category, Coordinates, CoordinateError, Material, PointOfInterest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
