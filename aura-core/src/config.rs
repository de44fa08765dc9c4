//! Configuration management
//!
//! Settings live in `<aura_dir>/settings.json`:
//! ```json
//! {
//!   "app": { "storage": "json", "authLatencyMs": 800, ... }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Which storage adapter backs the persisted state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Duckdb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Json => f.write_str("json"),
            StorageBackend::Duckdb => f.write_str("duckdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "duckdb" => Ok(StorageBackend::Duckdb),
            other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    storage: Option<StorageBackend>,
    #[serde(default)]
    auth_latency_ms: Option<u64>,
    #[serde(default)]
    upload_tick_ms: Option<u64>,
    #[serde(default)]
    upload_clear_delay_ms: Option<u64>,
    #[serde(default)]
    boot_delay_ms: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Delays used to simulate latency in the browser build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Pending time for a login/signup submit
    pub auth_latency: Duration,
    /// Interval between simulated upload progress ticks
    pub upload_tick: Duration,
    /// How long a finished upload keeps showing 100%
    pub upload_clear_delay: Duration,
    /// Init splash before the site is shown
    pub boot_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            auth_latency: Duration::from_millis(800),
            upload_tick: Duration::from_millis(150),
            upload_clear_delay: Duration::from_millis(800),
            boot_delay: Duration::from_millis(1500),
        }
    }
}

impl Timings {
    /// All delays zero, for scripted use
    pub fn instant() -> Self {
        Self {
            auth_latency: Duration::ZERO,
            upload_tick: Duration::ZERO,
            upload_clear_delay: Duration::ZERO,
            boot_delay: Duration::ZERO,
        }
    }
}

/// Aura configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storage: StorageBackend,
    pub timings: Timings,
}

impl Config {
    /// Load config from the aura directory
    ///
    /// The storage backend can be overridden with `AURA_STORAGE`
    /// (`json` or `duckdb`), e.g. for CI.
    pub fn load(aura_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(aura_dir)?;
        let defaults = Timings::default();
        let ms = |value: Option<u64>, default: Duration| {
            value.map(Duration::from_millis).unwrap_or(default)
        };

        let storage = match std::env::var("AURA_STORAGE").ok() {
            Some(value) => value.parse()?,
            None => raw.app.storage.unwrap_or_default(),
        };

        Ok(Self {
            storage,
            timings: Timings {
                auth_latency: ms(raw.app.auth_latency_ms, defaults.auth_latency),
                upload_tick: ms(raw.app.upload_tick_ms, defaults.upload_tick),
                upload_clear_delay: ms(raw.app.upload_clear_delay_ms, defaults.upload_clear_delay),
                boot_delay: ms(raw.app.boot_delay_ms, defaults.boot_delay),
            },
        })
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Save config to the aura directory
    ///
    /// Preserves other settings that this crate doesn't manage.
    pub fn save(&self, aura_dir: &Path) -> Result<()> {
        let mut settings = Self::read_settings(aura_dir)?;

        settings.app.storage = Some(self.storage);
        settings.app.auth_latency_ms = Some(self.timings.auth_latency.as_millis() as u64);
        settings.app.upload_tick_ms = Some(self.timings.upload_tick.as_millis() as u64);
        settings.app.upload_clear_delay_ms =
            Some(self.timings.upload_clear_delay.as_millis() as u64);
        settings.app.boot_delay_ms = Some(self.timings.boot_delay.as_millis() as u64);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(aura_dir.join("settings.json"), content)?;
        Ok(())
    }

    fn read_settings(aura_dir: &Path) -> Result<SettingsFile> {
        let settings_path = aura_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        match serde_json::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("ignoring unreadable settings.json: {}", e);
                Ok(SettingsFile::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.timings.auth_latency, Duration::from_millis(800));
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"theme": "dark", "uploadTickMs": 10}, "extra": [1, 2]}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.timings.upload_tick, Duration::from_millis(10));

        config.timings.auth_latency = Duration::from_millis(5);
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["app"]["theme"], "dark");
        assert_eq!(raw["app"]["authLatencyMs"], 5);
        assert_eq!(raw["extra"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("DuckDB".parse::<StorageBackend>().unwrap(), StorageBackend::Duckdb);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
