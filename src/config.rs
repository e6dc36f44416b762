use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::ai::{DEFAULT_BASE_URL, FlowLimits};
use crate::composer::DEFAULT_GOAL;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model provider settings (OpenRouter)
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub composer: ComposerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    #[serde(rename = "high-contrast")]
    HighContrast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Goal the rater judges emails against
    #[serde(default = "default_goal")]
    pub goal: String,
    /// Where copied drafts are saved (default: <data_dir>/drafts)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            goal: default_goal(),
            export_dir: None,
        }
    }
}

/// Model provider configuration (OpenRouter)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenRouter API key; env var and keyring take priority
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model to use (default: google/gemini-2.0-flash-001)
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,
    #[serde(default = "default_email_max_tokens")]
    pub email_max_tokens: u32,
    #[serde(default = "default_rating_max_tokens")]
    pub rating_max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_ai_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            summary_max_tokens: default_summary_max_tokens(),
            email_max_tokens: default_email_max_tokens(),
            rating_max_tokens: default_rating_max_tokens(),
        }
    }
}

impl AiConfig {
    pub fn limits(&self) -> FlowLimits {
        FlowLimits {
            summary_max_tokens: self.summary_max_tokens,
            email_max_tokens: self.email_max_tokens,
            rating_max_tokens: self.rating_max_tokens,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_ai_model() -> String {
    "google/gemini-2.0-flash-001".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_summary_max_tokens() -> u32 {
    400
}

fn default_email_max_tokens() -> u32 {
    900
}

fn default_rating_max_tokens() -> u32 {
    700
}

fn default_goal() -> String {
    DEFAULT_GOAL.to_string()
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("hookline");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_local_dir()
            .context("Could not find data directory")?
            .join("hookline");
        Ok(dir)
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("hookline.log"))
    }

    /// Directory copied drafts are written to
    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.composer.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("drafts")),
        }
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        let path = Self::config_path()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
