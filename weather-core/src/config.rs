use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::same_city;

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// City shown when neither the command line nor the config names one.
pub const FALLBACK_CITY: &str = "London";

/// Base URLs of the third-party services. Overridable so a proxy or a local
/// stub can be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub openweather: String,
    pub ip_lookup: String,
    pub reverse_geocode: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openweather: "https://api.openweathermap.org".to_string(),
            ip_lookup: "http://ip-api.com".to_string(),
            reverse_geocode: "https://api.bigdatacloud.net".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_cities = ["London", "Tokyo"]
/// timeout_secs = 10
///
/// [endpoints]
/// openweather = "https://api.openweathermap.org"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_cities: Vec<String>,
    pub timeout_secs: u64,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_cities: Vec::new(),
            timeout_secs: 10,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-cards", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored API key. Blank keys clear it.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        let key = api_key.into().trim().to_string();
        self.api_key = if key.is_empty() { None } else { Some(key) };
    }

    /// Append a default city unless an equivalent one is already listed.
    /// Returns `false` if the city was blank or a duplicate.
    pub fn add_default_city(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() || self.default_cities.iter().any(|c| same_city(c, city)) {
            return false;
        }
        self.default_cities.push(city.to_string());
        true
    }

    /// API key from `OPENWEATHER_API_KEY`, falling back to the config file.
    pub fn api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(from_env, self.api_key.as_deref())
    }

    /// Cities to show when none were requested explicitly.
    pub fn cities_or_fallback(&self) -> Vec<String> {
        if self.default_cities.is_empty() {
            vec![FALLBACK_CITY.to_string()]
        } else {
            self.default_cities.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| from_file.map(str::to_string))
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY");
        cfg.add_default_city("Tokyo");
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.default_cities, vec!["Tokyo".to_string()]);
        assert_eq!(loaded.endpoints, Endpoints::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_cities = [\"Lima\"]\n[endpoints]\nopenweather = \"http://localhost:9000\"\n")
            .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.default_cities, vec!["Lima".to_string()]);
        assert_eq!(cfg.endpoints.openweather, "http://localhost:9000");
        assert_eq!(cfg.endpoints.ip_lookup, Endpoints::default().ip_lookup);
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_cities = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn add_default_city_skips_duplicates_and_blanks() {
        let mut cfg = Config::default();
        assert!(cfg.add_default_city("Paris"));
        assert!(!cfg.add_default_city(" paris "));
        assert!(!cfg.add_default_city("  "));
        assert!(cfg.add_default_city("Zürich"));
        assert!(!cfg.add_default_city("ZÜRICH"));
        assert_eq!(cfg.default_cities, vec!["Paris".to_string(), "Zürich".to_string()]);
    }

    #[test]
    fn fallback_city_when_none_configured() {
        let cfg = Config::default();
        assert_eq!(cfg.cities_or_fallback(), vec![FALLBACK_CITY.to_string()]);
    }

    #[test]
    fn env_key_wins_over_file_key() {
        assert_eq!(resolve_api_key(Some("ENV".into()), Some("FILE")).as_deref(), Some("ENV"));
        assert_eq!(resolve_api_key(Some("  ".into()), Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(resolve_api_key(None, None), None);
        assert_eq!(resolve_api_key(None, Some("")), None);
    }

    #[test]
    fn blank_api_key_clears_it() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY");
        cfg.set_api_key("   ");
        assert_eq!(cfg.api_key, None);
    }
}
