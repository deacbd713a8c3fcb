use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::ai::{GenerationConfig, GEMINI_API_URL, GEMINI_MODEL, MISTRAL_API_URL, MISTRAL_MODEL};
use crate::error::{AppError, Result};
use crate::models::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_WORD_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Mistral,
    Gemini,
}

impl ProviderKind {
    /// Environment variable / secret name holding this provider's key.
    pub fn key_name(self) -> &'static str {
        match self {
            ProviderKind::Mistral => "MISTRAL_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Mistral => f.write_str("mistral"),
            ProviderKind::Gemini => f.write_str("gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mistral" => Ok(ProviderKind::Mistral),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(format!("unknown provider '{}' (expected mistral or gemini)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderKind,

    pub mistral_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_mistral_base_url")]
    pub mistral_base_url: String,
    #[serde(default = "default_mistral_model")]
    pub mistral_model: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_min_word_count")]
    pub min_word_count: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Send a tiny request to check the key before generating.
    #[serde(default = "default_verify_api_key")]
    pub verify_api_key: bool,

    /// Where articles are saved; the working directory when unset.
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_mistral_base_url() -> String {
    MISTRAL_API_URL.to_string()
}

fn default_mistral_model() -> String {
    MISTRAL_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    GEMINI_API_URL.to_string()
}

fn default_gemini_model() -> String {
    GEMINI_MODEL.to_string()
}

fn default_min_word_count() -> u32 {
    DEFAULT_MIN_WORD_COUNT
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_verify_api_key() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            mistral_api_key: None,
            gemini_api_key: None,
            mistral_base_url: default_mistral_base_url(),
            mistral_model: default_mistral_model(),
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            min_word_count: default_min_word_count(),
            max_attempts: default_max_attempts(),
            verify_api_key: default_verify_api_key(),
            output_dir: None,
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads `path`, writing a default config there first if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("longform")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("mistral_base_url", &self.mistral_base_url),
            ("gemini_base_url", &self.gemini_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::Config(format!("{} '{}': {}", field, value, e)))?;
        }
        if self.generation.timeout_secs == 0 {
            return Err(AppError::Config(
                "generation.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn api_key(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::Mistral => self.mistral_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
