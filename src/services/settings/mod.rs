//! Configuration file loading.
//!
//! `config.toml` lives in the platform config directory. A missing file means
//! defaults; an unreadable or invalid one falls back to defaults with a warning.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::settings::CalendarConfig;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "shifts.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub struct ConfigService {
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl ConfigService {
    /// Resolve paths from the platform directories.
    pub fn new() -> Self {
        let dirs = ProjectDirs::from("com", "ShiftCalendar", "shift-calendar");
        Self {
            config_path: dirs.as_ref().map(|d| d.config_dir().join(CONFIG_FILE)),
            data_dir: dirs.as_ref().map(|d| d.data_dir().to_path_buf()),
        }
    }

    /// Use an explicit config file, e.g. from the command line.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            data_dir: None,
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Read and validate the config file. A missing file yields defaults.
    pub fn try_load(&self) -> Result<CalendarConfig, ConfigError> {
        let Some(path) = &self.config_path else {
            return Ok(CalendarConfig::default());
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(CalendarConfig::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: CalendarConfig = toml::from_str(&contents)?;
        config.validate().map_err(ConfigError::Invalid)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(&self) -> CalendarConfig {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                CalendarConfig::default()
            }
        }
    }

    /// Database location: the configured path, else `shifts.db` in the data
    /// directory, else the working directory.
    pub fn database_path(&self, config: &CalendarConfig) -> PathBuf {
        if let Some(path) = &config.database_path {
            return path.clone();
        }
        match &self.data_dir {
            Some(dir) => dir.join(DATABASE_FILE),
            None => PathBuf::from(DATABASE_FILE),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("absent.toml"));
        assert_eq!(service.try_load().unwrap(), CalendarConfig::default());
    }

    #[test]
    fn test_reads_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "boundary_dwell_ms = 1200\ndatabase_path = \"/tmp/s.db\"").unwrap();

        let service = ConfigService::with_path(file.path());
        let config = service.try_load().unwrap();
        assert_eq!(config.boundary_dwell_ms, 1200);
        assert_eq!(service.database_path(&config), PathBuf::from("/tmp/s.db"));
    }

    #[test]
    fn test_bad_toml_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "boundary_dwell_ms = \"soon\"").unwrap();

        let service = ConfigService::with_path(file.path());
        assert!(matches!(service.try_load(), Err(ConfigError::Parse(_))));
        assert_eq!(service.load_or_default(), CalendarConfig::default());
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "boundary_dwell_ms = 0").unwrap();

        let service = ConfigService::with_path(file.path());
        assert!(matches!(service.try_load(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_database_defaults_to_working_directory_without_dirs() {
        let service = ConfigService::with_path("unused.toml");
        assert_eq!(
            service.database_path(&CalendarConfig::default()),
            PathBuf::from("shifts.db")
        );
    }
}
