//! Configuration loading for paramcache.
//!
//! Settings come from an optional TOML file and `PARAMCACHE__…` environment
//! variables, in that priority order (environment wins):
//!
//! ```toml
//! [defaults]
//! concurrency_level = 64
//!
//! [caches.search]
//! capacity = 10000
//! ignored_fields = ["trace_id"]
//!
//! [logging]
//! level = "info"
//! ```
//!
//! [`Settings::profile`] resolves a named cache section over the defaults
//! into the [`CacheOptions`](paramcache_core::CacheOptions) an engine is
//! built with. [`observability`] sets up the tracing subscriber.

pub mod loader;
pub mod observability;
pub mod settings;

pub use loader::{SettingsLoader, load_settings};
pub use settings::{CacheProfile, LoggingConfig, Settings};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown cache profile: {0}")]
    UnknownProfile(String),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
