//! Layered key-value configuration
//!
//! Settings live in two TOML files:
//! - a local `codedoc.toml` in the working directory
//! - a global `~/.codedoc/config/codedoc.toml`
//!
//! Local entries override global entries with the same key. A
//! [`ConfigContext`] owns the resolved paths and a load cache, so callers
//! (and tests) decide which directories are in play.

mod settings;

pub use settings::{
    DocumenterSettings, DEFAULT_EXTENSIONS, KEY_API_KEY, KEY_ENDPOINT, KEY_EXTENSIONS, KEY_MODEL,
    KEY_TEMPERATURE, KEY_TIMEOUT_SECS,
};

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of both the local and the global configuration
pub const CONFIG_FILE_NAME: &str = "codedoc.toml";

/// Where a [`Config`] was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Local,
    Global,
    /// Global entries overlaid with local ones
    Merged,
}

impl std::fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigScope::Local => write!(f, "local"),
            ConfigScope::Global => write!(f, "global"),
            ConfigScope::Merged => write!(f, "merged"),
        }
    }
}

/// A flat set of string settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    scope: ConfigScope,
    entries: BTreeMap<String, String>,
}

impl Config {
    /// Create an empty configuration
    pub fn new(scope: ConfigScope) -> Self {
        Self {
            scope,
            entries: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> ConfigScope {
        self.scope
    }

    pub fn is_local(&self) -> bool {
        self.scope == ConfigScope::Local
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a value, returning it
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of `self`; keys in `other` win
    fn merged_with(&self, other: &Config) -> Config {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Config {
            scope: ConfigScope::Merged,
            entries,
        }
    }

    /// Read a configuration file, or return an empty config if it is absent
    fn load(path: &Path, scope: ConfigScope) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(scope));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let table: BTreeMap<String, toml::Value> = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        let entries = table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(Self { scope, entries })
    }

    /// Write the entries as a flat TOML table, creating parent directories
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content =
            toml::to_string_pretty(&self.entries).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[derive(Debug, Default)]
struct ConfigCache {
    local: Option<Config>,
    global: Option<Config>,
}

/// Resolves, loads and saves the local and global configuration
#[derive(Debug)]
pub struct ConfigContext {
    work_dir: PathBuf,
    home_dir: Option<PathBuf>,
    cache: RefCell<ConfigCache>,
}

impl ConfigContext {
    /// Create a context rooted at explicit directories
    pub fn new(work_dir: impl Into<PathBuf>, home_dir: Option<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            home_dir,
            cache: RefCell::new(ConfigCache::default()),
        }
    }

    /// Create a context for the current directory and user's home
    pub fn from_env() -> Result<Self> {
        let work_dir =
            std::env::current_dir().context("Failed to determine the current directory")?;
        Ok(Self::new(work_dir, dirs::home_dir()))
    }

    /// Path of the local configuration file
    pub fn local_path(&self) -> PathBuf {
        self.work_dir.join(CONFIG_FILE_NAME)
    }

    /// Path of the global configuration file, if a home directory is known
    pub fn global_path(&self) -> Option<PathBuf> {
        self.home_dir
            .as_ref()
            .map(|home| home.join(".codedoc").join("config").join(CONFIG_FILE_NAME))
    }

    pub fn local_config(&self) -> Result<Config> {
        if let Some(ref config) = self.cache.borrow().local {
            return Ok(config.clone());
        }

        let config = Config::load(&self.local_path(), ConfigScope::Local)?;
        self.cache.borrow_mut().local = Some(config.clone());
        Ok(config)
    }

    pub fn global_config(&self) -> Result<Config> {
        if let Some(ref config) = self.cache.borrow().global {
            return Ok(config.clone());
        }

        let config = match self.global_path() {
            Some(path) => Config::load(&path, ConfigScope::Global)?,
            None => {
                tracing::debug!("No home directory; global configuration is empty");
                Config::new(ConfigScope::Global)
            }
        };
        self.cache.borrow_mut().global = Some(config.clone());
        Ok(config)
    }

    /// Global configuration overlaid with the local one
    pub fn all_configs(&self) -> Result<Config> {
        let global = self.global_config()?;
        let local = self.local_config()?;
        Ok(global.merged_with(&local))
    }

    pub fn save_local_config(&self, config: &Config) -> Result<()> {
        let path = self.local_path();
        config.save(&path)?;
        tracing::info!(path = ?path, "Saved local configuration");
        self.cache.borrow_mut().local = None;
        Ok(())
    }

    pub fn save_global_config(&self, config: &Config) -> Result<()> {
        let path = self
            .global_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot save global configuration: no home directory"))?;
        config.save(&path)?;
        tracing::info!(path = ?path, "Saved global configuration");
        self.cache.borrow_mut().global = None;
        Ok(())
    }

    /// Drop cached configs and read both files again
    pub fn reload(&self) -> Result<()> {
        self.clear();
        self.local_config()?;
        self.global_config()?;
        Ok(())
    }

    /// Drop cached configs; the next access reads from disk
    pub fn clear(&self) {
        *self.cache.borrow_mut() = ConfigCache::default();
    }
}
