//! Global context for cordpack operations.
//!
//! Provides centralized access to the working directory, manifest lookup
//! and merged configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::find_manifest;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::diagnostic::suggestions;

/// Global context shared by all commands.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    global_config: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a context for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Self::with_cwd(cwd)
    }

    /// Create a context rooted at a specific directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
        })
    }

    /// Use a specific global config file instead of `~/.cordpack/config.toml`.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find Cordpack.toml in the working directory or its ancestors.
    pub fn find_manifest(&self) -> Option<PathBuf> {
        find_manifest(&self.cwd)
    }

    /// Resolve the manifest to use: an explicit path, or the nearest one.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            let path = self.cwd.join(path);
            if !path.is_file() {
                anyhow::bail!("manifest not found: {}", path.display());
            }
            return Ok(path);
        }

        self.find_manifest().ok_or_else(|| {
            anyhow::anyhow!(
                "could not find Cordpack.toml in {} or any parent directory\n{}",
                self.cwd.display(),
                suggestions::NO_MANIFEST
            )
        })
    }

    /// Load configuration for a workspace rooted at `workspace_root`.
    pub fn config(&self, workspace_root: &Path) -> Config {
        load_config(
            self.global_config.as_deref(),
            &project_config_path(workspace_root),
        )
    }
}
