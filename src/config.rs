use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HabitrackConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_habitrack_dir()
            .join("habits.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

/// Returns `~/.habitrack/`, or `./.habitrack/` when no home directory is known.
pub fn default_habitrack_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".habitrack")
}

/// Returns the default config file path: `~/.habitrack/config.toml`
pub fn default_config_path() -> PathBuf {
    default_habitrack_dir().join("config.toml")
}

impl HabitrackConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            HabitrackConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (HABITRACK_DB, HABITRACK_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HABITRACK_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("HABITRACK_LOG_LEVEL") {
            self.logging.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HabitrackConfig::default();
        assert_eq!(config.logging.log_level, "info");
        assert!(config.storage.db_path.ends_with("habits.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[storage]
db_path = "/tmp/habits-test.db"
"#;
        let config: HabitrackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.db_path, "/tmp/habits-test.db");
        // unset sections fall back to defaults
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = HabitrackConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert!(config.resolved_db_path().to_string_lossy().len() > 0);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[storage\ndb_path = 3").unwrap();
        assert!(HabitrackConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = HabitrackConfig::default();
        std::env::set_var("HABITRACK_DB", "/tmp/override.db");
        std::env::set_var("HABITRACK_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.logging.log_level, "trace");

        std::env::remove_var("HABITRACK_DB");
        std::env::remove_var("HABITRACK_LOG_LEVEL");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/var/db/h.db"), PathBuf::from("/var/db/h.db"));
    }
}
