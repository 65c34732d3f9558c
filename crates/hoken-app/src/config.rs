//! Configuration management for hoken-academy
//!
//! Config stored at: ~/.config/hoken-academy/config.json

use std::path::{Path, PathBuf};
use std::time::Duration;

use hoken_ai::ai::gemini::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_SPEECH_MODEL, DEFAULT_TEXT_MODEL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_VOICE,
};
use hoken_ai::GeminiConfig;
use hoken_domain::PolicyHolder;
use hoken_types::{ConfigError, Language, OutputFormat, Result, RubyStyle};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "hoken-academy";

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model for text and JSON requests
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Prebuilt voice for narration
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key (falls back to GEMINI_API_KEY, then API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Data directory override for stored policies and claims
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Show only one language of trilingual text
    #[serde(default)]
    pub language: Option<Language>,

    #[serde(default)]
    pub ruby_style: RubyStyle,

    /// Contractor and insured name on new policies
    #[serde(default = "default_contractor_name")]
    pub contractor_name: String,

    #[serde(default = "default_beneficiary_name")]
    pub beneficiary_name: String,
}

fn default_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_contractor_name() -> String {
    "山田 太郎 / Yamada Taro".to_string()
}

fn default_beneficiary_name() -> String {
    "山田 花子 / Yamada Hanako".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            speech_model: default_speech_model(),
            image_model: default_image_model(),
            voice: default_voice(),
            api_base_url: default_api_base_url(),
            api_key: None,
            request_timeout_secs: default_timeout_secs(),
            data_dir: None,
            output_format: OutputFormat::default(),
            language: None,
            ruby_style: RubyStyle::default(),
            contractor_name: default_contractor_name(),
            beneficiary_name: default_beneficiary_name(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding the policy and claim lists
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir().ok_or(ConfigError::NotFound)?.join(APP_DIR);
        Ok(data_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Configured key, else the first non-empty environment variable
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        self.api_key
            .clone()
            .into_iter()
            .chain(API_KEY_ENV_VARS.iter().filter_map(|name| lookup(name)))
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey.into())
    }

    pub fn gemini_config(&self) -> Result<GeminiConfig> {
        Ok(GeminiConfig {
            api_key: self.resolve_api_key()?,
            base_url: self.api_base_url.clone(),
            text_model: self.model.clone(),
            speech_model: self.speech_model.clone(),
            image_model: self.image_model.clone(),
            voice: self.voice.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    /// Names printed on newly signed policies
    pub fn holder(&self) -> PolicyHolder {
        PolicyHolder {
            contractor_name: self.contractor_name.clone(),
            insured_name: self.contractor_name.clone(),
            beneficiary: self.beneficiary_name.clone(),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hoken Academy Configuration")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "Model:          {}", self.model)?;
        writeln!(f, "Speech model:   {}", self.speech_model)?;
        writeln!(f, "Image model:    {}", self.image_model)?;
        writeln!(f, "Voice:          {}", self.voice)?;
        writeln!(f, "API base URL:   {}", self.api_base_url)?;
        writeln!(
            f,
            "API key:        {}",
            match self.api_key {
                Some(_) => "(set)",
                None => "(from environment)",
            }
        )?;
        writeln!(f, "Timeout:        {}s", self.request_timeout_secs)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(
            f,
            "Language:       {}",
            self.language.map(|l| l.code()).unwrap_or("(all)")
        )?;
        writeln!(f, "Ruby style:     {}", self.ruby_style)?;
        writeln!(f, "Contractor:     {}", self.contractor_name)?;
        writeln!(f, "Beneficiary:    {}", self.beneficiary_name)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": "gemini-2.5-pro", "language": "japanese"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.language, Some(Language::Japanese));
        assert_eq!(config.voice, DEFAULT_VOICE);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            contractor_name: "佐藤 一郎".to_string(),
            output_format: OutputFormat::Json,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(hoken_types::Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_api_key_resolution_order() {
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some("".to_string()),
            "API_KEY" => Some("from-api-key".to_string()),
            _ => None,
        };
        let config = Config::default();
        assert_eq!(config.resolve_api_key_with(env).unwrap(), "from-api-key");

        let config = Config {
            api_key: Some("configured".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_api_key_with(env).unwrap(), "configured");

        assert!(Config::default().resolve_api_key_with(|_| None).is_err());
    }

    #[test]
    fn test_holder_uses_contractor_as_insured() {
        let holder = Config::default().holder();
        assert_eq!(holder.contractor_name, holder.insured_name);
        assert_eq!(holder.beneficiary, "山田 花子 / Yamada Hanako");
    }
}
