//! Configuration file support for cordpack.
//!
//! Two locations are read:
//! - Global: `~/.cordpack/config.toml` - User-wide defaults
//! - Project: `.cordpack/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::packager::MissingArtifactPolicy;

/// Suffix used for the packaged archive name when none is configured.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "cordapp";

/// cordpack configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Packaging settings
    pub package: PackageConfig,
}

/// Packaging-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PackageConfig {
    /// Default policy for sub-projects without an archive
    pub on_missing_artifact: Option<MissingArtifactPolicy>,

    /// Extra path globs dropped from merged dependencies
    pub exclude_paths: Vec<String>,

    /// Suffix of the packaged archive name (`<project>-<suffix>.jar`)
    pub output_suffix: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.package.on_missing_artifact.is_some() {
            self.package.on_missing_artifact = other.package.on_missing_artifact;
        }
        // Exclusions accumulate rather than replace.
        for pattern in other.package.exclude_paths {
            if !self.package.exclude_paths.contains(&pattern) {
                self.package.exclude_paths.push(pattern);
            }
        }
        if other.package.output_suffix.is_some() {
            self.package.output_suffix = other.package.output_suffix;
        }
    }

    /// The archive name suffix, defaulted.
    pub fn output_suffix(&self) -> &str {
        self.package
            .output_suffix
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_SUFFIX)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cordpack/config.toml)
/// 2. Global config (~/.cordpack/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global cordpack config directory (~/.cordpack).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cordpack"))
}

/// Get the global config path (~/.cordpack/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cordpack/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cordpack").join("config.toml")
}
