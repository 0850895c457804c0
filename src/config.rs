//! Application configuration.
//!
//! Defaults match the shipped resource layout; a JSON file may override any
//! field and command-line flags override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("page_length must be at least 1")]
    InvalidPageLength,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the file names below are resolved against.
    pub resource_dir: PathBuf,
    pub sqlite_file: String,
    pub query_file: String,
    pub csv_file: String,
    /// Rows per page in the raw-data view.
    pub page_length: usize,
    /// Re-run the SQL extraction before loading, even if the CSV exists.
    pub extract_on_start: bool,
    pub title: String,
    /// Where the dashboard links to for the raw-data viewer.
    pub data_page: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("resource"),
            sqlite_file: "exercise01.sqlite".to_string(),
            query_file: "records_flatten.sql".to_string(),
            csv_file: "exercise_records.csv".to_string(),
            page_length: 20,
            extract_on_start: false,
            title: "Census Income Dashboard".to_string(),
            data_page: "show_data.html".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. A relative `resource_dir` is taken relative to
    /// the file's own directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = serde_json::from_str(&contents)?;

        if config.resource_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.resource_dir = parent.join(&config.resource_dir);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_length == 0 {
            return Err(ConfigError::InvalidPageLength);
        }
        Ok(())
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.resource_dir.join(&self.sqlite_file)
    }

    pub fn query_path(&self) -> PathBuf {
        self.resource_dir.join(&self.query_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.resource_dir.join(&self.csv_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_length, 20);
        assert_eq!(config.csv_path(), PathBuf::from("resource/exercise_records.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"page_length": 50, "resource_dir": "data"}"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.page_length, 50);
        assert_eq!(config.resource_dir, dir.path().join("data"));
        assert_eq!(config.csv_file, "exercise_records.csv");
    }

    #[test]
    fn test_zero_page_length_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"page_length": 0}"#).unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::InvalidPageLength)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
