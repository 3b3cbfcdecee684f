//! Typed documenter settings resolved from a [`Config`]

use super::Config;
use crate::llm::LlmConfig;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::time::Duration;

pub const KEY_ENDPOINT: &str = "llm.endpoint";
pub const KEY_MODEL: &str = "llm.model";
pub const KEY_API_KEY: &str = "llm.api_key";
pub const KEY_TEMPERATURE: &str = "llm.temperature";
pub const KEY_TIMEOUT_SECS: &str = "llm.timeout_secs";
pub const KEY_EXTENSIONS: &str = "documenter.extensions";

/// Extensions expanded from a directory target when nothing is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["java"];

/// Everything the documentation pipeline needs to run
#[derive(Debug, Clone)]
pub struct DocumenterSettings {
    /// Inference endpoint settings
    pub llm: LlmConfig,
    /// Lowercase extensions, without the leading dot
    pub extensions: BTreeSet<String>,
}

impl Default for DocumenterSettings {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl DocumenterSettings {
    /// Resolve settings from configuration entries, falling back to defaults
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(endpoint) = non_empty(config.get(KEY_ENDPOINT)) {
            settings.llm.endpoint = endpoint.to_string();
        }
        if let Some(model) = non_empty(config.get(KEY_MODEL)) {
            settings.llm.model = model.to_string();
        }
        if let Some(key) = non_empty(config.get(KEY_API_KEY)) {
            settings.llm.api_key = Some(key.to_string());
        }
        if let Some(raw) = non_empty(config.get(KEY_TEMPERATURE)) {
            let temperature: f32 = raw
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", KEY_TEMPERATURE, raw))?;
            settings.llm.temperature = Some(temperature);
        }
        if let Some(raw) = non_empty(config.get(KEY_TIMEOUT_SECS)) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", KEY_TIMEOUT_SECS, raw))?;
            settings.llm.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = non_empty(config.get(KEY_EXTENSIONS)) {
            settings = settings.with_extensions(raw.split(','));
        }

        Ok(settings)
    }

    /// Replace the extension set; empty items are ignored
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed: BTreeSet<String> = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();

        if !parsed.is_empty() {
            self.extensions = parsed;
        }
        self
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigScope;

    #[test]
    fn test_defaults_when_unconfigured() {
        let settings = DocumenterSettings::from_config(&Config::new(ConfigScope::Merged)).unwrap();

        assert_eq!(settings.llm.endpoint, crate::llm::DEFAULT_ENDPOINT);
        assert_eq!(settings.llm.model, crate::llm::DEFAULT_MODEL);
        assert!(settings.extensions.contains("java"));
        assert_eq!(settings.extensions.len(), 1);
    }

    #[test]
    fn test_reads_llm_keys() {
        let mut config = Config::new(ConfigScope::Merged);
        config.set(KEY_ENDPOINT, "http://gpu-box:8080");
        config.set(KEY_MODEL, "codellama");
        config.set(KEY_API_KEY, "sk-test");
        config.set(KEY_TEMPERATURE, "0.2");
        config.set(KEY_TIMEOUT_SECS, "90");

        let settings = DocumenterSettings::from_config(&config).unwrap();
        assert_eq!(settings.llm.endpoint, "http://gpu-box:8080");
        assert_eq!(settings.llm.model, "codellama");
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.llm.temperature, Some(0.2));
        assert_eq!(settings.llm.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        let mut config = Config::new(ConfigScope::Merged);
        config.set(KEY_TEMPERATURE, "warm");
        assert!(DocumenterSettings::from_config(&config).is_err());

        let mut config = Config::new(ConfigScope::Merged);
        config.set(KEY_TIMEOUT_SECS, "-1");
        assert!(DocumenterSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_extension_list_parsing() {
        let mut config = Config::new(ConfigScope::Merged);
        config.set(KEY_EXTENSIONS, " .RS, py,, .java ");

        let settings = DocumenterSettings::from_config(&config).unwrap();
        let exts: Vec<_> = settings.extensions.iter().map(String::as_str).collect();
        assert_eq!(exts, vec!["java", "py", "rs"]);
    }

    #[test]
    fn test_empty_extension_override_keeps_defaults() {
        let settings = DocumenterSettings::default().with_extensions([" ", ""]);
        assert!(settings.extensions.contains("java"));
    }
}
