//! Configuration for registry loading, routing, and the director.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DEFAULT_MODEL;

/// Complete director configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Registry loading configuration.
    pub registry: RegistryConfig,
    /// Router configuration.
    pub routing: RouterConfig,
    /// Decision thresholds.
    pub thresholds: ThresholdConfig,
    /// Plan document lookup configuration.
    pub plans: PlanConfig,
}

/// Registry loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory containing agent description documents.
    pub agents_dir: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            agents_dir: PathBuf::from("agents"),
        }
    }
}

/// Router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Name of the generalist agent used when no match is found.
    pub fallback_agent: String,
    /// Model assigned to agents that do not declare one.
    pub default_model: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fallback_agent: "EventParser".to_owned(),
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }
}

/// Confidence thresholds partitioning routing decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Confidence at or above which a task is executed automatically.
    pub execute: f64,
    /// Confidence at or above which a task is executed with caution;
    /// below this, a new agent is suggested instead.
    pub caution: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            execute: 0.6,
            caution: 0.3,
        }
    }
}

/// Plan document lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Directory containing `<plan_id>/tasks.md` documents.
    pub plans_dir: PathBuf,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            plans_dir: PathBuf::from("plans"),
        }
    }
}

impl DirectorConfig {
    /// Get the default config directory path (`~/.stagehand`).
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".stagehand"))
    }

    /// Get the default config file path (`~/.stagehand/config.toml`).
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it with default
    /// values if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Toml`]
    /// if it cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save config to a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Stagehand Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DirectorConfig::default();
        assert_eq!(config.registry.agents_dir, PathBuf::from("agents"));
        assert_eq!(config.routing.fallback_agent, "EventParser");
        assert_eq!(config.routing.default_model, DEFAULT_MODEL);
        assert!((config.thresholds.execute - 0.6).abs() < f64::EPSILON);
        assert!((config.thresholds.caution - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.plans.plans_dir, PathBuf::from("plans"));
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");

        let mut config = DirectorConfig::default();
        config.routing.fallback_agent = "Generalist".to_owned();
        config.thresholds.execute = 0.75;
        config.save_to_file(&path)?;

        let loaded = DirectorConfig::load_from_file(&path)?;
        assert_eq!(loaded.routing.fallback_agent, "Generalist");
        assert!((loaded.thresholds.execute - 0.75).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_saved_config_carries_header() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");

        DirectorConfig::default().save_to_file(&path)?;
        let contents = fs::read_to_string(&path)?;
        assert!(contents.starts_with("# Stagehand Configuration File"));
        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp = TempDir::new().expect("temp dir");
        let result = DirectorConfig::load_from_file(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "routing = not toml").expect("write config");

        let result = DirectorConfig::load_from_file(&path);
        assert!(matches!(result, Err(Error::Toml(_))));
    }
}
