//! Configuration for the depot index toolkit
//!
//! Configuration can be loaded from a TOML file and/or environment
//! variables with the `DEPOT_` prefix.

use crate::artifact::RepositoryKind;
use crate::error::{Error, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the depot toolkit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cap applied to searches across the whole index set
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Repositories to open an index for
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

/// One repository entry in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Stable identifier, unique across the configuration
    pub id: String,
    pub kind: RepositoryKind,
    /// Local directory for `local` repositories, URL for `remote` ones
    pub path_or_url: String,
}

fn default_max_search_results() -> usize {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_search_results: default_max_search_results(),
            repositories: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `DEPOT_` and use double
    /// underscores for nested values. For example:
    /// - `DEPOT_MAX_SEARCH_RESULTS=50`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("DEPOT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to load configuration: {e}")))?;

        // Missing keys fall back through the #[serde(default)] attributes
        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Invalid configuration: {e}")))
    }

    /// Validates cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for repo in &self.repositories {
            if repo.id.is_empty() {
                return Err(Error::config("Repository id must not be empty"));
            }
            if !seen.insert(&repo.id) {
                return Err(Error::config(format!(
                    "Duplicate repository id '{}'",
                    repo.id
                )));
            }
        }
        if self.max_search_results == 0 {
            return Err(Error::config("max_search_results must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    // Process environment is shared across test threads; every test that
    // goes through from_file holds this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        match ENV_LOCK.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        std::env::set_var(key, value);
        let result = f();
        std::env::remove_var(key);
        result
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let _guard = env_lock();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config::from_file(&temp_dir.path().join("absent.toml"))
            .expect("missing file should fall back to defaults");

        assert_eq!(config.max_search_results, 200);
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = env_lock();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("depot.toml");
        fs::write(
            &path,
            r#"
max_search_results = 25

[[repositories]]
id = "local"
kind = "local"
path_or_url = "/tmp/repo"

[[repositories]]
id = "central"
kind = "remote"
path_or_url = "https://repo1.maven.org/maven2"
"#,
        )
        .expect("Failed to write config file");

        let config = Config::from_file(&path).expect("config should load");
        assert_eq!(config.max_search_results, 25);
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.repositories[1].kind, RepositoryKind::Remote);
        config.validate().expect("config should validate");
    }

    #[test]
    fn test_env_var_overrides_file_value() {
        let _guard = env_lock();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("depot.toml");
        fs::write(&path, "max_search_results = 25\n").expect("Failed to write config file");

        let config = with_env_var("DEPOT_MAX_SEARCH_RESULTS", "50", || Config::from_file(&path))
            .expect("config should load");
        assert_eq!(config.max_search_results, 50);

        // Without the variable the file value applies again
        let config = Config::from_file(&path).expect("config should load");
        assert_eq!(config.max_search_results, 25);
    }

    #[test]
    fn test_env_var_applies_without_a_file() {
        let _guard = env_lock();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = with_env_var("DEPOT_MAX_SEARCH_RESULTS", "7", || {
            Config::from_file(&temp_dir.path().join("absent.toml"))
        })
        .expect("config should load");
        assert_eq!(config.max_search_results, 7);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let config = Config {
            repositories: vec![
                RepositoryConfig {
                    id: "central".to_string(),
                    kind: RepositoryKind::Remote,
                    path_or_url: "https://repo1.maven.org/maven2".to_string(),
                },
                RepositoryConfig {
                    id: "central".to_string(),
                    kind: RepositoryKind::Local,
                    path_or_url: "/tmp/repo".to_string(),
                },
            ],
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }
}
