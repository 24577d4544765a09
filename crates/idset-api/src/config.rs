//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`ServerConfig::database_url`].
pub const ENV_DATABASE_URL: &str = "IDSET_DATABASE_URL";
/// Environment variable overriding [`ServerConfig::listen_addr`].
pub const ENV_LISTEN_ADDR: &str = "IDSET_LISTEN_ADDR";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// PostgreSQL connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Seconds between result cache sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Prepended to relative link hrefs in table output.
    #[serde(default)]
    pub link_prefix: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
    /// Apply pending migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost/idset".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            link_prefix: String::new(),
            log_json: false,
            run_migrations: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Load from `path` when given, otherwise start from defaults, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, std::io::Error> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
            self.database_url = url;
        }
        if let Some(addr) = lookup(ENV_LISTEN_ADDR).filter(|v| !v.is_empty()) {
            self.listen_addr = addr;
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Sweep period, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ServerConfig = serde_yaml::from_str(
            "database_url: postgres://db/reports\nlink_prefix: https://app.example.com\nsweep_interval_secs: 15\n",
        )
        .unwrap();

        assert_eq!(config.database_url, "postgres://db/reports");
        assert_eq!(config.link_prefix, "https://app.example.com");
        assert_eq!(config.sweep_interval(), Duration::from_secs(15));
        assert_eq!(config.listen_addr, default_listen_addr());
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE_URL, "postgres://override/db"),
            (ENV_LISTEN_ADDR, ""),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "postgres://override/db");
        // empty values are ignored
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_zero_sweep_interval_is_clamped() {
        let config = ServerConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }
}
