use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/lodestone.db?mode=rwc".into()
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_filter() -> String {
    "lodestone=info".into()
}

impl Config {
    /// Read `path` if it exists, fall back to defaults otherwise, then apply
    /// `LODESTONE_*` environment overrides.
    ///
    /// Runs before logging is configured, so rejected overrides come back as
    /// messages for the caller to log once a subscriber is installed.
    pub fn load(path: &str) -> Result<(Self, Vec<String>)> {
        let mut config = if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        let warnings = config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, warnings))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(value) = lookup("LODESTONE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = lookup("LODESTONE_DATABASE_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(parsed) => self.database.max_connections = parsed,
                Err(_) => warnings.push(format!(
                    "Ignoring invalid LODESTONE_DATABASE_MAX_CONNECTIONS value '{}'",
                    value
                )),
            }
        }
        if let Some(value) = lookup("LODESTONE_LOG_FILTER") {
            self.logging.filter = value;
        }
        warnings
    }
}
