//! Forms Configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::application::embed::EmbedPosition;
use crate::error::{FormsError, Result};

pub const API_URL_ENV: &str = "BIZHUB_API_URL";
pub const API_KEY_ENV: &str = "BIZHUB_API_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// BizHub API connection
    pub api: ApiConfig,
    /// Embed snippet defaults
    pub embed: EmbedConfig,
    /// CSV import settings
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Base delay; doubled on every retry
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bizhub.io/v1".into(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub widget_base_url: String,
    pub default_position: EmbedPosition,
    pub iframe_height: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            widget_base_url: "https://app.bizhub.io".into(),
            default_position: EmbedPosition::Inline,
            iframe_height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Contacts handed to the sink per bulk call
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

impl FormsConfig {
    /// Load from a TOML file, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| FormsError::Config(format!("{}: {e}", path.display())))?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FormsError::Config(e.to_string()))?;
        if config.import.batch_size == 0 {
            return Err(FormsError::Config("import.batch_size must be at least 1".into()));
        }
        Ok(config)
    }

    /// Apply `BIZHUB_API_URL` / `BIZHUB_API_KEY` as looked up by `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api.api_key = Some(key);
        }
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FormsError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FormsConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.import.batch_size, 100);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:8080\"\nmax_retries = 0\n\n[embed]\ndefault_position = \"slide-in\""
        )
        .unwrap();

        let config = FormsConfig::from_toml(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.max_retries, 0);
        assert_eq!(config.api.retry_delay_ms, 1000);
        assert_eq!(config.embed.default_position, EmbedPosition::SlideIn);
    }

    #[test]
    fn test_env_overrides() {
        let config = FormsConfig::default().with_overrides(|key| match key {
            API_URL_ENV => Some("http://override".into()),
            API_KEY_ENV => Some("secret".into()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://override");
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = FormsConfig::from_toml("[import]\nbatch_size = 0").unwrap_err();
        assert!(matches!(err, FormsError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FormsConfig::default();
        assert_eq!(FormsConfig::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }
}
