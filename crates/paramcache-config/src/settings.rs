use std::collections::HashMap;

use paramcache_core::CacheOptions;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Log levels accepted by `[logging] level`.
pub const VALID_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Options every cache starts from
    #[serde(default)]
    pub defaults: CacheOptions,
    /// Named per-cache overrides
    #[serde(default)]
    pub caches: HashMap<String, CacheProfile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overrides for a single named cache.
///
/// Unset fields fall back to `[defaults]`. `capacity = 0` makes the cache
/// unbounded even when the defaults set a capacity. `ignored_fields` adds to
/// the default list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheProfile {
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub ignored_fields: Vec<String>,
    #[serde(default)]
    pub concurrency_level: Option<usize>,
}

impl CacheProfile {
    /// Apply this profile on top of `base`.
    pub fn apply(&self, base: &CacheOptions) -> CacheOptions {
        let mut options = base.clone().ignore_fields(self.ignored_fields.iter().cloned());
        if let Some(capacity) = self.capacity {
            options = options.with_capacity(capacity);
        }
        if let Some(level) = self.concurrency_level {
            options = options.with_concurrency_level(level);
        }
        options
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.defaults
            .validate()
            .map_err(|e| ConfigError::validation(format!("defaults: {e}")))?;

        for (name, profile) in &self.caches {
            if name.trim().is_empty() {
                return Err(ConfigError::validation("cache profile names must not be blank"));
            }
            profile
                .apply(&self.defaults)
                .validate()
                .map_err(|e| ConfigError::validation(format!("caches.{name}: {e}")))?;
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !VALID_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {VALID_LEVELS:?}"
            )));
        }
        Ok(())
    }

    /// Options for the cache named `name`, merged over the defaults.
    pub fn profile(&self, name: &str) -> Result<CacheOptions> {
        self.caches
            .get(name)
            .map(|profile| profile.apply(&self.defaults))
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    /// Options for `name`, or the defaults when no such profile exists.
    pub fn profile_or_defaults(&self, name: &str) -> CacheOptions {
        self.profile(name).unwrap_or_else(|_| self.defaults.clone())
    }

    /// Configured profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caches.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
