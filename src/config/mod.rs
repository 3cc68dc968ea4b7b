//! Configuration module for the explorer.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, LoggingSettings, QuerySettings, ServerSettings, Settings,
    SettingsError,
};
