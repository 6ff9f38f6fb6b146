//! Settings structures for Suggest-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub suggest: SuggestSettings,
    pub provider: ProviderSettings,
    pub outgoing: OutgoingSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SUGGEST_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SUGGEST_MIN_LENGTH") {
            if let Ok(n) = val.parse() {
                self.suggest.min_length = n;
            }
        }
        if let Ok(val) = std::env::var("SUGGEST_DEBOUNCE_MS") {
            if let Ok(n) = val.parse() {
                self.suggest.debounce_ms = n;
            }
        }
        if let Ok(val) = std::env::var("SUGGEST_LIMIT") {
            if let Ok(n) = val.parse() {
                self.suggest.limit = n;
            }
        }
        if let Ok(val) = std::env::var("SUGGEST_API_URL") {
            self.provider.api_url = val;
        }
        if let Ok(val) = std::env::var("SUGGEST_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
    }

    /// Reject configurations the widget cannot run with
    pub fn validate(&self) -> Result<()> {
        self.suggest.validate()?;

        let api = Url::parse(&self.provider.api_url)
            .map_err(|e| anyhow::anyhow!("provider.api_url must be absolute: {}", e))?;
        if api.cannot_be_a_base() {
            anyhow::bail!("provider.api_url cannot be used as a base URL");
        }

        if self.storage.retention_minutes == 0 {
            anyhow::bail!("storage.retention_minutes must be greater than zero");
        }

        Ok(())
    }
}

/// Widget behavior: how long to wait, how short is too short, how many rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Terms shorter than this (in characters) never reach the provider
    pub min_length: usize,
    /// Quiet period before a term settles, in milliseconds
    pub debounce_ms: u64,
    /// Maximum number of suggestions requested per search
    pub limit: u32,
}

impl SuggestSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            anyhow::bail!("suggest.limit must be greater than zero");
        }
        Ok(())
    }
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            min_length: 3,
            debounce_ms: 500,
            limit: 10,
        }
    }
}

/// Remote search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Absolute URL of the opensearch endpoint
    pub api_url: String,
    /// Namespace filter sent with every query
    pub namespace: String,
    /// Upper bound for a single lookup, in seconds
    pub timeout: f64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            namespace: "0".to_string(),
            timeout: 5.0,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Appended to the User-Agent header
    pub useragent_suffix: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            useragent_suffix: None,
            pool_maxsize: 4,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Where snapshots are kept between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Lives as long as the process
    Memory,
    /// JSON files in a session directory
    #[default]
    File,
}

/// Snapshot storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Session directory; defaults to the user cache dir
    pub path: Option<PathBuf>,
    /// Snapshots older than this are ignored and deleted
    pub retention_minutes: u64,
}

impl StorageSettings {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_minutes.saturating_mul(60))
    }

    /// Resolve the session directory for the file backend
    pub fn session_dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("suggest-rs")
                .join("session")
        })
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            retention_minutes: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.suggest.min_length, 3);
        assert_eq!(settings.suggest.debounce_ms, 500);
        assert_eq!(settings.suggest.limit, 10);
        assert_eq!(settings.provider.namespace, "0");
        assert_eq!(settings.storage.retention(), Duration::from_secs(30 * 60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "suggest:\n  limit: 5\nstorage:\n  backend: memory\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.suggest.limit, 5);
        assert_eq!(settings.suggest.min_length, 3);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.retention_minutes, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.suggest.limit = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.provider.api_url = "/w/api.php".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.storage.retention_minutes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_huge_retention_saturates() {
        let storage = StorageSettings {
            retention_minutes: u64::MAX,
            ..Default::default()
        };
        assert_eq!(storage.retention(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let storage = StorageSettings {
            path: Some(PathBuf::from("/tmp/snapshots")),
            ..Default::default()
        };
        assert_eq!(storage.session_dir(), PathBuf::from("/tmp/snapshots"));
    }
}
