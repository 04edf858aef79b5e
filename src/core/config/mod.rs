//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Example
//!
//! ```no_run
//! use giclone::core::config::Config;
//! use giclone::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/path/to/work"));
//! let config = Config::load(Some(&paths)).unwrap();
//!
//! println!("default branch: {}", config.default_branch());
//! println!("snapshot mode: {:?}", config.snapshot_mode());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig, SnapshotMode};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::fs::write_atomic;
use crate::core::paths::RepoPaths;
use crate::core::types::BranchName;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if present)
    pub repo: Option<RepoConfig>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `paths` is provided, also loads the repository's config file.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated. Missing files are not an error.
    pub fn load(paths: Option<&RepoPaths>) -> Result<Self, ConfigError> {
        let global = Self::load_global()?;
        global.validate()?;

        let (repo, repo_path) = match paths {
            Some(paths) => {
                let path = paths.config_path();
                if path.exists() {
                    let repo: RepoConfig = read_toml(&path)?;
                    repo.validate()?;
                    (Some(repo), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        Ok(Config {
            global,
            repo,
            repo_path,
        })
    }

    fn load_global() -> Result<GlobalConfig, ConfigError> {
        for path in Self::global_candidates() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading global config");
                return read_toml(&path);
            }
        }
        Ok(GlobalConfig::default())
    }

    fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("GICLONE_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("giclone/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".giclone/config.toml"));
        }
        candidates
    }

    /// Write repo config atomically.
    pub fn write_repo(paths: &RepoPaths, config: &RepoConfig) -> Result<PathBuf, ConfigError> {
        config.validate()?;
        let path = paths.config_path();
        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        write_atomic(&path, contents.as_bytes()).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// The branch a fresh repository's HEAD names.
    ///
    /// Repo overrides global; defaults to `main`.
    pub fn default_branch(&self) -> BranchName {
        self.repo
            .as_ref()
            .and_then(|r| r.default_branch.as_deref())
            .or(self.global.default_branch.as_deref())
            .and_then(|name| BranchName::new(name).ok())
            .unwrap_or_default()
    }

    /// How commits derive their file map. Defaults to layered.
    pub fn snapshot_mode(&self) -> SnapshotMode {
        self.repo
            .as_ref()
            .and_then(|r| r.snapshot)
            .unwrap_or_default()
    }

    /// Path the repo config was loaded from.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
