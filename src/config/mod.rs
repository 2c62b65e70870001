use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub const TOKEN_ENV: &str = "WORKFORCE_HUB_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub default_remarks: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// No timeout beyond the HTTP client's own default when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            api_base_url: default_api_base_url(),
            api_token: None,
            default_remarks: None,
            latitude: None,
            longitude: None,
            request_timeout_secs: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Config {
    /// Return the configuration directory (`~/.workforce-hub`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".workforce-hub")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("workforce-hub.conf")
    }

    /// Return the full path of the SQLite state database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("workforce-hub.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Token from `WORKFORCE_HUB_TOKEN`, falling back to the config file.
    pub fn resolved_token(&self) -> Option<String> {
        env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api_token.clone())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Initialize the configuration directory, config file and database path.
    /// Returns the resolved database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("api_base_url: https://hr.example.com/api\n").unwrap();
        assert_eq!(cfg.api_base_url, "https://hr.example.com/api");
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert!(cfg.request_timeout().is_none());
        assert!(cfg.database.ends_with("workforce-hub.sqlite"));
    }

    #[test]
    fn full_config_round_trips_through_yaml() {
        let cfg = Config {
            api_token: Some("abc".into()),
            latitude: Some(45.46),
            longitude: Some(9.19),
            request_timeout_secs: Some(20),
            ..Config::default()
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.api_token.as_deref(), Some("abc"));
        assert_eq!(back.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(back.latitude, Some(45.46));
    }

    #[test]
    fn tick_interval_is_never_zero() {
        let cfg = Config {
            tick_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(cfg.tick_interval(), Duration::from_millis(1));
    }
}
