//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GICLONE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/giclone/config.toml`
//! 3. `~/.giclone/config.toml`
//!
//! # Repo Config
//!
//! Located at `.giclone/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., `default_branch`
//! must be a valid branch name). Unknown keys are rejected.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// How a commit's file map is derived from the staging index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    /// Parent's file map overlaid with the staged entries.
    #[default]
    Layered,
    /// Exactly the staged entries; paths not re-staged drop out.
    Override,
}

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// default_branch = "main"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Branch HEAD names in newly initialized repositories
    pub default_branch: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_branch(self.default_branch.as_deref())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// default_branch = "trunk"
/// snapshot = "layered"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Branch the first commit lands on when HEAD is missing
    pub default_branch: Option<String>,

    /// How commits derive their file map
    pub snapshot: Option<SnapshotMode>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_branch(self.default_branch.as_deref())
    }
}

fn validate_branch(name: Option<&str>) -> Result<(), ConfigError> {
    if let Some(name) = name {
        BranchName::new(name).map_err(|e| {
            ConfigError::InvalidValue(format!("default_branch '{}': {}", name, e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_mode_parses_lowercase() {
        let cfg: RepoConfig = toml::from_str("snapshot = \"override\"").unwrap();
        assert_eq!(cfg.snapshot, Some(SnapshotMode::Override));

        let cfg: RepoConfig = toml::from_str("snapshot = \"layered\"").unwrap();
        assert_eq!(cfg.snapshot, Some(SnapshotMode::Layered));
    }

    #[test]
    fn unknown_snapshot_mode_rejected() {
        let parsed: Result<RepoConfig, _> = toml::from_str("snapshot = \"merge\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn invalid_default_branch_rejected() {
        let cfg = GlobalConfig {
            default_branch: Some("bad..name".into()),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(RepoConfig::default().validate().is_ok());
        assert!(GlobalConfig::default().validate().is_ok());
    }
}
