use thiserror::Error;

pub mod app_config;
pub mod channels;
pub mod config;
pub mod profile;

pub use app_config::{AppConfig, Environment};
pub use channels::{
    load_channels_file, ChannelConfig, ChannelDefinition, ChannelsFile, IndustryModifier,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use profile::{AnalyticsSnapshot, EntityProfile, Goal};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read channels file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse channels file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("duplicate channel slug in channels file: {0}")]
    DuplicateChannel(String),
}
