use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::locate::LocateStrategy;
use crate::model::UnitSystem;

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default unit system for new sessions.
    #[serde(default)]
    pub unit: UnitSystem,

    /// Minutes between automatic refreshes of the current reading.
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,

    /// Optional location strategy, e.g. "reverse-geocode" or "ip-city".
    /// When absent, reverse-geocode is used if its key is configured.
    pub location_strategy: Option<String>,

    /// API keys by service name. Example TOML:
    /// [keys]
    /// openweather = "..."
    /// locationiq = "..."
    #[serde(default)]
    pub keys: HashMap<String, String>,
}

fn default_refresh_minutes() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: UnitSystem::default(),
            refresh_minutes: default_refresh_minutes(),
            location_strategy: None,
            keys: HashMap::new(),
        }
    }
}

impl Config {
    pub const OPENWEATHER: &'static str = "openweather";
    pub const LOCATIONIQ: &'static str = "locationiq";

    pub fn openweather_key(&self) -> Option<&str> {
        self.keys.get(Self::OPENWEATHER).map(String::as_str)
    }

    pub fn locationiq_key(&self) -> Option<&str> {
        self.keys.get(Self::LOCATIONIQ).map(String::as_str)
    }

    /// Set/replace an API key by service name.
    pub fn set_key(&mut self, service: &str, api_key: String) {
        self.keys.insert(service.to_string(), api_key);
    }

    /// Return the location strategy as a strongly-typed value.
    pub fn locate_strategy(&self) -> Result<LocateStrategy> {
        match self.location_strategy.as_ref() {
            Some(s) => LocateStrategy::try_from(s.as_str()),
            // No explicit choice: use the full variant when its key
            // is present, the keyless one otherwise.
            None if self.locationiq_key().is_some() => Ok(LocateStrategy::ReverseGeocode),
            None => Ok(LocateStrategy::IpCity),
        }
    }

    pub fn set_locate_strategy(&mut self, strategy: LocateStrategy) {
        self.location_strategy = Some(strategy.as_str().to_string());
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes * 60)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyglance", "skyglance")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_metric_every_half_hour() {
        let cfg = Config::default();
        assert_eq!(cfg.unit, UnitSystem::Metric);
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(30 * 60));
        assert_eq!(cfg.locate_strategy().unwrap(), LocateStrategy::IpCity);
    }

    #[test]
    fn toml_roundtrip_preserves_keys_and_unit() {
        let mut cfg = Config::default();
        cfg.unit = UnitSystem::Imperial;
        cfg.set_key(Config::OPENWEATHER, "OPEN_KEY".into());
        cfg.set_key(Config::LOCATIONIQ, "LIQ_KEY".into());

        let serialized = toml::to_string_pretty(&cfg).expect("config must serialize");
        let parsed: Config = toml::from_str(&serialized).expect("config must parse back");

        assert_eq!(parsed.unit, UnitSystem::Imperial);
        assert_eq!(parsed.openweather_key(), Some("OPEN_KEY"));
        assert_eq!(parsed.locationiq_key(), Some("LIQ_KEY"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("unit = \"imperial\"").expect("config must parse");

        assert_eq!(parsed.unit, UnitSystem::Imperial);
        assert_eq!(parsed.refresh_minutes, 30);
        assert!(parsed.keys.is_empty());
    }

    #[test]
    fn locationiq_key_switches_the_default_strategy() {
        let mut cfg = Config::default();
        cfg.set_key(Config::LOCATIONIQ, "LIQ_KEY".into());

        assert_eq!(cfg.locate_strategy().unwrap(), LocateStrategy::ReverseGeocode);
    }

    #[test]
    fn explicit_strategy_overrides_the_key_heuristic() {
        let mut cfg = Config::default();
        cfg.set_key(Config::LOCATIONIQ, "LIQ_KEY".into());
        cfg.set_locate_strategy(LocateStrategy::IpCity);

        assert_eq!(cfg.locate_strategy().unwrap(), LocateStrategy::IpCity);
    }

    #[test]
    fn unknown_strategy_in_file_errors() {
        let cfg = Config {
            location_strategy: Some("carrier-pigeon".to_string()),
            ..Config::default()
        };

        let err = cfg.locate_strategy().unwrap_err();
        assert!(err.to_string().contains("Unknown location strategy"));
    }
}
