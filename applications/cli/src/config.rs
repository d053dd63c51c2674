/// Cadence configuration
use cadence_library::ScanConfig;
use cadence_playback::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Environment variable prefix (`CADENCE_DATABASE_URL`, ...)
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: PathBuf,

    /// Directories scanned for device songs
    #[serde(default)]
    pub music_dirs: Vec<PathBuf>,

    #[serde(default = "default_buffering_timeout_secs")]
    pub buffering_timeout_secs: u64,

    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: u64,

    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl CadenceConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with CADENCE_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("music_dirs"),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid(format!(
                "database_url must be a sqlite: URL, got {:?}",
                self.database_url
            )));
        }

        if self.buffering_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "buffering_timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.min_duration_secs > self.max_duration_secs {
            return Err(ConfigError::Invalid(format!(
                "min_duration_secs ({}) exceeds max_duration_secs ({})",
                self.min_duration_secs, self.max_duration_secs
            )));
        }

        Ok(())
    }

    /// On-disk database file, if the URL names one
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.database_url.contains(":memory:") {
            return None;
        }
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);
        Some(PathBuf::from(path))
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            min_duration: Duration::from_secs(self.min_duration_secs),
            max_duration: Duration::from_secs(self.max_duration_secs),
            ..ScanConfig::with_directories(self.music_dirs.iter().cloned())
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            buffering_timeout: Duration::from_secs(self.buffering_timeout_secs),
            ..EngineConfig::default()
        }
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data").join(cadence_storage::settings::SETTINGS_FILE_NAME)
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./data").join(cadence_library::audit::AUDIT_FILE_NAME)
}

fn default_buffering_timeout_secs() -> u64 {
    15
}

fn default_min_duration_secs() -> u64 {
    30
}

fn default_max_duration_secs() -> u64 {
    60 * 60
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            settings_path: default_settings_path(),
            audit_log_path: default_audit_log_path(),
            music_dirs: Vec::new(),
            buffering_timeout_secs: default_buffering_timeout_secs(),
            min_duration_secs: default_min_duration_secs(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CadenceConfig::default();
        config.validate().unwrap();
        assert_eq!(config.engine_config().buffering_timeout, Duration::from_secs(15));
        assert_eq!(config.database_path(), Some(PathBuf::from("./data/cadence.db")));
    }

    #[test]
    fn inverted_duration_bounds_are_rejected() {
        let config = CadenceConfig {
            min_duration_secs: 100,
            max_duration_secs: 10,
            ..CadenceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn non_sqlite_url_is_rejected() {
        let config = CadenceConfig {
            database_url: "postgres://localhost/cadence".to_string(),
            ..CadenceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn in_memory_database_has_no_path() {
        let config = CadenceConfig {
            database_url: "sqlite::memory:".to_string(),
            ..CadenceConfig::default()
        };
        assert_eq!(config.database_path(), None);
    }

    #[test]
    fn scan_bounds_come_from_config() {
        let config = CadenceConfig {
            music_dirs: vec![PathBuf::from("/music")],
            min_duration_secs: 5,
            ..CadenceConfig::default()
        };
        let scan = config.scan_config();
        assert_eq!(scan.directories, vec![PathBuf::from("/music")]);
        assert_eq!(scan.min_duration, Duration::from_secs(5));
        assert_eq!(scan.max_duration, Duration::from_secs(3600));
    }
}
