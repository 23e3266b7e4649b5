/// TOML configuration file handling.
pub mod toml_config;

pub use toml_config::{AttorneyConfig, ConfigError};
