//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use moodreel_search::DEFAULT_DEBOUNCE;
use serde::Deserialize;
use url::Url;

/// File name looked up inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Suggestion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Search behaviour.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Suggestion provider configuration.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ProviderConfig {
    /// API key, used when `OPENAI_API_KEY` is unset or blank.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API, ending in `/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Chat model identifier.
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Search configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period in milliseconds before a query is sent.
    #[serde(default)]
    pub debounce_ms: Option<u64>,
}

impl AppConfig {
    /// Config file location: `{dir}/config.toml` when `dir` is given,
    /// otherwise `$HOME/.config/moodreel/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is unset.
    pub fn path_in(dir: Option<&Path>) -> Result<PathBuf> {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
                PathBuf::from(home).join(".config").join("moodreel")
            }
        };
        Ok(dir.join(CONFIG_FILE))
    }

    /// Resolves the config path for `dir` and loads it.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file is invalid.
    pub fn load_from(dir: Option<&Path>) -> Result<(PathBuf, Self)> {
        let path = Self::path_in(dir)?;
        let config = Self::load(&path)?;
        Ok((path, config))
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Picks the credential: `env_key` when non-blank, else `provider.api_key`.
    ///
    /// Returns `None` when neither is set to a non-blank value.
    #[must_use]
    pub fn credential(&self, env_key: Option<String>) -> Option<String> {
        env_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.provider.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Parsed provider base URL, if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if `provider.base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.provider
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).with_context(|| format!("invalid provider.base_url: {raw}"))
            })
            .transpose()
    }

    /// Debounce delay, falling back to the library default.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.search
            .debounce_ms
            .map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.debounce(), Duration::from_millis(600));
        assert!(config.base_url().unwrap().is_none());
    }

    #[test]
    fn test_path_in_explicit_dir() {
        // Arrange
        let dir = Path::new("/srv/moodreel");

        // Act
        let path = AppConfig::path_in(Some(dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/moodreel/config.toml"));
    }

    #[test]
    fn test_path_in_defaults_under_home() {
        // Arrange & Act
        let path = AppConfig::path_in(None).unwrap();

        // Assert
        assert!(path.ends_with(".config/moodreel/config.toml"));
    }

    #[test]
    fn test_load_from_dir_reads_config_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[search]\ndebounce_ms = 5\n").unwrap();

        // Act
        let (path, config) = AppConfig::load_from(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(path, dir.path().join("config.toml"));
        assert_eq!(config.debounce(), Duration::from_millis(5));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[provider]
api_key = "sk-file"
base_url = "http://localhost:8080/v1/"
model = "gpt-4o"
temperature = 0.2

[search]
debounce_ms = 150
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.provider.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.provider.temperature, Some(0.2));
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(
            config.base_url().unwrap().unwrap().as_str(),
            "http://localhost:8080/v1/"
        );
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\napi_key = 1").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed to parse"));
    }

    #[test]
    fn test_invalid_base_url() {
        // Arrange
        let config = AppConfig {
            provider: ProviderConfig {
                base_url: Some(String::from("not a url")),
                ..ProviderConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let result = config.base_url();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_env_credential_wins() {
        // Arrange
        let config = AppConfig {
            provider: ProviderConfig {
                api_key: Some(String::from("sk-file")),
                ..ProviderConfig::default()
            },
            ..AppConfig::default()
        };

        // Act & Assert
        assert_eq!(
            config.credential(Some(String::from("sk-env"))).as_deref(),
            Some("sk-env")
        );
        assert_eq!(
            config.credential(Some(String::from("  "))).as_deref(),
            Some("sk-file")
        );
        assert_eq!(config.credential(None).as_deref(), Some("sk-file"));
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        // Arrange
        let config = AppConfig {
            provider: ProviderConfig {
                api_key: Some(String::from("   ")),
                ..ProviderConfig::default()
            },
            ..AppConfig::default()
        };

        // Act & Assert
        assert!(config.credential(None).is_none());
        assert!(config.credential(Some(String::new())).is_none());
    }
}
