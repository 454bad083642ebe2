//! # verdict-config
//!
//! Layered configuration loading for Verdict using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VERDICT_*` prefix, `__` as separator)
//! 2. Project-level `.verdict/config.toml`
//! 3. User-level `~/.config/verdict/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VERDICT_DATABASE__PATH` -> `database.path`,
//! `VERDICT_AGGREGATION__IDLE_TIMEOUT_MS` -> `aggregation.idle_timeout_ms`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use verdict_config::VerdictConfig;
//!
//! let config = VerdictConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod aggregation;
mod database;
mod error;
mod general;

pub use aggregation::AggregationConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local configuration directory.
pub const PROJECT_DIR: &str = ".verdict";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VerdictConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl VerdictConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with `project_root/.verdict/config.toml` as the
    /// project layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for a given project root.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VERDICT_").split("__"))
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.aggregation.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "aggregation.retry_max_attempts".into(),
                reason: "at least one attempt is required".into(),
            });
        }
        if self.aggregation.idle_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "aggregation.idle_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.aggregation.retry_base_delay_ms > self.aggregation.retry_max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "aggregation.retry_base_delay_ms".into(),
                reason: "must not exceed aggregation.retry_max_delay_ms".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("verdict").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VerdictConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.aggregation.retry_max_attempts, 4);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = VerdictConfig::figment_for(Path::new("/nonexistent-verdict-root"));
        let config: VerdictConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = VerdictConfig::default();
        config.aggregation.retry_max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "aggregation.retry_max_attempts"));
    }

    #[test]
    fn base_delay_above_cap_rejected() {
        let mut config = VerdictConfig::default();
        config.aggregation.retry_base_delay_ms = 5_000;
        assert!(config.validate().is_err());
    }
}
