//! Configuration management for R.A.D.A.R.
//!
//! Handles loading and saving configuration from TOML files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Classification;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// UI/TUI settings
    pub ui: UiConfig,

    /// AI settings
    pub ai: AiConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Classification preselected in the retrieval form
    pub default_classification: Classification,
}

/// UI/TUI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, midnight)
    pub theme: String,
}

/// AI integration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// AI provider (gemini, claude, openai, ollama)
    pub provider: ProviderKind,

    /// Model to use; provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Claude,
    #[serde(rename = "openai")]
    OpenAI,
    Ollama,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => anyhow::bail!("Unknown AI provider: {other} (expected gemini, claude, openai or ollama)"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.radar.toml` in current directory
    /// 2. `~/.config/radar/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing config file in the search order.
    pub fn find_config_file() -> Option<PathBuf> {
        // Try local config first
        let local_config = PathBuf::from(".radar.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try global config
        let global_config = Self::config_dir()?.join("config.toml");
        global_config.exists().then_some(global_config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("radar"))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { default_classification: Classification::Unclassified }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "default".to_string() }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { provider: ProviderKind::Gemini, model: None, base_url: None }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.default_classification, Classification::Unclassified);
        assert_eq!(config.ui.theme, "default");
        assert_eq!(config.ai.provider, ProviderKind::Gemini);
        assert!(config.ai.model.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[ai]"));
        assert!(toml_str.contains("provider = \"gemini\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            default_classification = "SECRET"

            [ui]
            theme = "midnight"

            [ai]
            provider = "openai"
            model = "gpt-4o-mini"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_classification, Classification::Secret);
        assert_eq!(config.ui.theme, "midnight");
        assert_eq!(config.ai.provider, ProviderKind::OpenAI);
        assert_eq!(config.ai.model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.ai.base_url.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[ai]\nprovider = \"ollama\"\n").unwrap();
        assert_eq!(config.ai.provider, ProviderKind::Ollama);
        assert_eq!(config.ui.theme, "default");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(toml::from_str::<Config>("[ai]\nprovider = \"bard\"\n").is_err());
        assert!("bard".parse::<ProviderKind>().is_err());
        assert_eq!("Anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Claude);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ai]\nprovider = \"claude\"\nbase_url = \"http://proxy\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.ai.provider, ProviderKind::Claude);
        assert_eq!(config.ai.base_url.as_deref(), Some("http://proxy"));
    }
}
