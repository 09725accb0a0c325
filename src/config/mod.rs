use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::api::Proxies;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retrieval settings
    pub fetch: FetchConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Language priority list, highest priority first
    pub languages: Vec<String>,

    /// Proxy for plain HTTP requests
    pub http_proxy: Option<String>,

    /// Proxy for HTTPS requests
    pub https_proxy: Option<String>,

    /// Keep basic HTML formatting tags in caption text
    pub preserve_formatting: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Accept-Language header sent to YouTube
    pub accept_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,

    /// Keep going when a video in a batch fails
    pub continue_after_error: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            http_proxy: None,
            https_proxy: None,
            preserve_formatting: false,
            timeout_secs: 30,
            accept_language: "en-US".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_format: "pretty".to_string(),
            continue_after_error: true,
        }
    }
}

impl FetchConfig {
    /// Proxies configured for every request
    pub fn proxies(&self) -> Proxies {
        Proxies {
            http: self.http_proxy.clone(),
            https: self.https_proxy.clone(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // A file in the working directory wins
        let local_config = PathBuf::from("transcripts.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("youtube-transcripts").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fetch.languages.is_empty() {
            anyhow::bail!("At least one language must be configured");
        }

        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }

        for proxy in [&self.fetch.http_proxy, &self.fetch.https_proxy].into_iter().flatten() {
            let parsed = Url::parse(proxy)
                .with_context(|| format!("Invalid proxy URL: {}", proxy))?;

            if !matches!(parsed.scheme(), "http" | "https" | "socks5" | "socks5h") {
                anyhow::bail!("Proxy URL must use http, https or socks5: {}", proxy);
            }
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Languages: {}", self.fetch.languages.join(", "));
        if let Some(proxy) = &self.fetch.http_proxy {
            println!("  HTTP Proxy: {}", proxy);
        }
        if let Some(proxy) = &self.fetch.https_proxy {
            println!("  HTTPS Proxy: {}", proxy);
        }
        println!("  Preserve Formatting: {}", self.fetch.preserve_formatting);
        println!("  Timeout: {}s", self.fetch.timeout_secs);
        println!("  Default Format: {}", self.app.default_output_format);
        println!("  Continue After Error: {}", self.app.continue_after_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch.languages, vec!["en".to_string()]);
        assert!(config.fetch.proxies().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.fetch.languages = vec!["de".to_string(), "en".to_string()];
        config.fetch.https_proxy = Some("http://proxy.local:3128".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.fetch.proxies().https.as_deref(), Some("http://proxy.local:3128"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "fetch:\n  languages: [fr]\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.fetch.languages, vec!["fr".to_string()]);
        assert_eq!(loaded.fetch.timeout_secs, 30);
        assert_eq!(loaded.app, AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.fetch.languages.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fetch.http_proxy = Some("ftp://proxy.local".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fetch.http_proxy = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }
}
