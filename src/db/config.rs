//! Application configuration file support.
//!
//! This module provides utilities for reading scheduling-core configuration
//! from TOML files, with environment variables taking precedence where both
//! are set.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::RepositoryError;
use super::factory::RepositoryType;
use crate::scheduling::waitlist::WaitlistPolicy;

/// Application configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub waitlist: WaitlistSettings,
    #[serde(default)]
    pub scheduling: SchedulingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repository: RepositorySettings::default(),
            waitlist: WaitlistSettings::default(),
            scheduling: SchedulingSettings::default(),
        }
    }
}

/// Repository backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// Waitlist promotion policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistSettings {
    /// Minutes a manually-confirmed promotion stays claimable.
    #[serde(default = "default_confirmation_window")]
    pub confirmation_window_minutes: i64,
}

impl Default for WaitlistSettings {
    fn default() -> Self {
        Self {
            confirmation_window_minutes: default_confirmation_window(),
        }
    }
}

fn default_confirmation_window() -> i64 {
    60
}

/// Template validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Days ahead to project a proposed template when checking instructor
    /// conflicts at validation time.
    #[serde(default = "default_validation_lookahead")]
    pub validation_lookahead_days: i64,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            validation_lookahead_days: default_validation_lookahead(),
        }
    }
}

fn default_validation_lookahead() -> i64 {
    28
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(RepositoryError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration, preferring `STUDIO_CONFIG` from the environment,
    /// then `studio.toml` in the current or parent directory, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, RepositoryError> {
        if let Ok(path) = std::env::var("STUDIO_CONFIG") {
            return Self::from_file(path);
        }

        let search_paths = [PathBuf::from("studio.toml"), PathBuf::from("../studio.toml")];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Get the repository type from configuration, with the
    /// `REPOSITORY_TYPE` environment variable taking precedence.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return RepositoryType::from_str(&val);
        }
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Waitlist policy derived from configuration.
    pub fn waitlist_policy(&self) -> WaitlistPolicy {
        WaitlistPolicy {
            confirmation_window_minutes: self.waitlist.confirmation_window_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.waitlist.confirmation_window_minutes, 60);
        assert_eq!(config.scheduling.validation_lookahead_days, 28);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[repository]
type = "local"

[waitlist]
confirmation_window_minutes = 30

[scheduling]
validation_lookahead_days = 14
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.waitlist.confirmation_window_minutes, 30);
        assert_eq!(config.scheduling.validation_lookahead_days, 14);
        assert_eq!(config.waitlist_policy().confirmation_window_minutes, 30);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let toml = r#"
[waitlist]
confirmation_window_minutes = 15
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.waitlist.confirmation_window_minutes, 15);
        assert_eq!(config.scheduling.validation_lookahead_days, 28);
    }
}
