//! DPI Configuration
//!
//! The awareness mode is an application decision, so it comes from
//! `dpiaware.toml` rather than from anything this crate detects.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::HighDpiMode;
use crate::log::exe_dir;

/// File name searched for by [`DpiConfig::find_config_path`]
pub const CONFIG_FILE_NAME: &str = "dpiaware.toml";

/// Configuration loaded from dpiaware.toml
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DpiConfig {
    /// Awareness mode to request before the first window is created
    #[serde(default)]
    pub high_dpi_mode: HighDpiMode,

    /// Diagnostic log settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Log file settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Relative paths resolve against the executable's directory
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("dpiaware.log")
}

impl LogConfig {
    /// Log file location with relative paths anchored at the exe directory
    pub fn resolved_path(&self) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            exe_dir().join(&self.file)
        }
    }
}

impl DpiConfig {
    /// Find dpiaware.toml in standard locations
    pub fn find_config_path() -> Option<PathBuf> {
        // Check in order: %APPDATA%/dpiaware, exe dir, cwd
        let candidates = [
            dirs::config_dir().map(|p| p.join("dpiaware").join(CONFIG_FILE_NAME)),
            Some(exe_dir().join(CONFIG_FILE_NAME)),
            Some(PathBuf::from(CONFIG_FILE_NAME)),
        ];

        candidates.into_iter().flatten().find(|c| c.exists())
    }

    /// Load configuration from file, returning defaults if not found or invalid
    pub fn load() -> Self {
        match Self::find_config_path() {
            Some(path) => Self::load_from_path(&path).unwrap_or_else(|e| {
                log!("DpiConfig: {} unusable ({}), using defaults", path.display(), e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DpiConfig::default();
        assert_eq!(config.high_dpi_mode, HighDpiMode::SystemAware);
        assert!(!config.log.enabled);
        assert_eq!(config.log.file, PathBuf::from("dpiaware.log"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(DpiConfig::from_toml("").unwrap(), DpiConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = DpiConfig::from_toml(
            r#"
            high_dpi_mode = "PerMonitorV2"

            [log]
            enabled = true
            file = "C:/logs/dpi.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.high_dpi_mode, HighDpiMode::PerMonitorV2);
        assert!(config.log.enabled);
        assert_eq!(config.log.file, PathBuf::from("C:/logs/dpi.log"));
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let err = DpiConfig::from_toml("high_dpi_mode = \"Sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "high_dpi_mode = \"DpiUnawareGdiScaled\"").unwrap();

        let config = DpiConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.high_dpi_mode, HighDpiMode::DpiUnawareGdiScaled);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DpiConfig::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_relative_log_path_resolves_against_exe_dir() {
        let log = LogConfig::default();
        assert_eq!(log.resolved_path(), exe_dir().join("dpiaware.log"));
    }
}
