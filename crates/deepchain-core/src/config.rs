//! Configuration management for DeepChain
//!
//! Session-level settings: which model answers every generation call, where
//! the generation backend lives, the template locale and how response-stage
//! failures are reported.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Locale;
use crate::{DeepChainError, Result};

/// Directory holding the config file, relative to the base directory
pub const CONFIG_DIR: &str = ".deepchain";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Session configuration
///
/// Loaded from `.deepchain/config.toml` in the base directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepChainConfig {
    /// Generation backend settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Template and message language
    #[serde(default)]
    pub locale: Locale,

    /// How response and synthesis failures are reported
    #[serde(default)]
    pub degrade: DegradePolicy,
}

/// Generation backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Ollama server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Policy for failures of the response and synthesis stages
///
/// Intent and prompt failures always abort the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradePolicy {
    /// Replace the failed text with a visible error placeholder
    #[default]
    Embed,
    /// Abort the turn with a typed error
    Abort,
}

impl std::str::FromStr for DegradePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embed" => Ok(Self::Embed),
            "abort" => Ok(Self::Abort),
            _ => Err(format!("Invalid degrade policy: {}. Use embed or abort.", s)),
        }
    }
}

// Default value providers
fn default_model() -> String {
    "gemma2:9b".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

impl DeepChainConfig {
    /// Load configuration from `.deepchain/config.toml` or use defaults
    pub fn load_or_default(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config = toml::from_str(&content).map_err(|e| {
                DeepChainError::Config(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            tracing::debug!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            tracing::debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.deepchain/config.toml`
    ///
    /// Returns the path of the written file.
    pub fn write_default(base_dir: &Path) -> Result<std::path::PathBuf> {
        let config_dir = base_dir.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(&Self::default()).map_err(|e| {
            DeepChainError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }
}

impl Default for DeepChainConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            locale: Locale::default(),
            degrade: DegradePolicy::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DeepChainConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, DeepChainConfig::default());
        assert_eq!(config.generation.model, "gemma2:9b");
        assert_eq!(config.degrade, DegradePolicy::Embed);
    }

    #[test]
    fn test_write_then_load_default() {
        let dir = TempDir::new().unwrap();
        let path = DeepChainConfig::write_default(dir.path()).unwrap();
        assert!(path.ends_with(".deepchain/config.toml"));

        let config = DeepChainConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, DeepChainConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_DIR).join(CONFIG_FILE),
            "locale = \"ru\"\ndegrade = \"abort\"\n\n[generation]\nmodel = \"gemma2:27b\"\n",
        )
        .unwrap();

        let config = DeepChainConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.locale, Locale::Russian);
        assert_eq!(config.degrade, DegradePolicy::Abort);
        assert_eq!(config.generation.model, "gemma2:27b");
        assert_eq!(config.generation.base_url, "http://localhost:11434");
        assert_eq!(config.generation.timeout_secs, None);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_DIR).join(CONFIG_FILE),
            "locale = [",
        )
        .unwrap();

        let err = DeepChainConfig::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, DeepChainError::Config(_)));
    }

    #[test]
    fn test_degrade_policy_from_str() {
        assert_eq!("Embed".parse::<DegradePolicy>().unwrap(), DegradePolicy::Embed);
        assert_eq!("abort".parse::<DegradePolicy>().unwrap(), DegradePolicy::Abort);
        assert!("retry".parse::<DegradePolicy>().is_err());
    }
}
