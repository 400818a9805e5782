use std::path::{Path, PathBuf};

use config::{Config, Environment, File};

use crate::Result;
use crate::settings::Settings;

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "paramcache.toml";

/// Default environment prefix, e.g. `PARAMCACHE__DEFAULTS__CAPACITY=1000`.
pub const DEFAULT_ENV_PREFIX: &str = "PARAMCACHE";

/// Builds [`Settings`] from a file and environment overrides.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file instead of `paramcache.toml`. A missing file is skipped.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load, merge and validate the settings.
    pub fn load(&self) -> Result<Settings> {
        let mut builder = Config::builder();

        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading cache settings file");
            builder = builder.add_source(File::from(path));
        }

        // Environment variable overrides, e.g., PARAMCACHE__CACHES__SEARCH__CAPACITY=500
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("defaults.ignored_fields"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Load settings from `path` (or `paramcache.toml`) plus `PARAMCACHE__…` overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let loader = SettingsLoader::new();
    match path {
        Some(path) => loader.file(path).load(),
        None => loader.load(),
    }
}
