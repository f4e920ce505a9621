//! Shared configuration for the `staycheck` workspace.

mod app_config;
mod config;

use thiserror::Error;

pub use app_config::{AgodaCredentials, AppConfig};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
