//! Workspace - the loaded manifest plus the paths derived from it.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::graph::{ProjectGraph, ProjectId};
use crate::core::manifest::Manifest;
use crate::core::settings::CordappSettings;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Cordpack.toml";

/// Search `start` and its ancestors for a manifest.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}

/// A loaded workspace.
#[derive(Debug)]
pub struct Workspace {
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Load the workspace described by a manifest file.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        Ok(Workspace {
            manifest_path: manifest_path.to_path_buf(),
            manifest,
        })
    }

    /// Build a workspace from an already-parsed manifest.
    pub fn from_manifest(manifest_path: PathBuf, manifest: Manifest) -> Self {
        Workspace {
            manifest_path,
            manifest,
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.manifest.manifest_dir
    }

    pub fn graph(&self) -> &ProjectGraph {
        &self.manifest.graph
    }

    /// The project being packaged.
    pub fn root_project(&self) -> ProjectId {
        self.manifest.root
    }

    pub fn root_project_name(&self) -> &str {
        self.manifest.root_name()
    }

    pub fn settings(&self) -> &CordappSettings {
        &self.manifest.cordapp
    }

    /// Directory packaged archives are written to by default.
    pub fn libs_dir(&self) -> PathBuf {
        self.root().join("build").join("libs")
    }

    /// Default output path for the packaged archive.
    pub fn default_output(&self, suffix: &str) -> PathBuf {
        self.libs_dir()
            .join(format!("{}-{}.jar", self.root_project_name(), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_workspace(dir: &Path) -> PathBuf {
        let manifest_path = dir.join(MANIFEST_NAME);
        std::fs::write(
            &manifest_path,
            r#"
[cordapp]
target-platform-version = 4

[[project]]
name = "workflows"
"#,
        )
        .unwrap();
        manifest_path
    }

    #[test]
    fn test_workspace_creation() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = create_test_workspace(tmp.path());

        let ws = Workspace::new(&manifest_path).unwrap();
        assert_eq!(ws.root_project_name(), "workflows");
        assert_eq!(ws.root(), tmp.path());
    }

    #[test]
    fn test_workspace_paths() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = create_test_workspace(tmp.path());

        let ws = Workspace::new(&manifest_path).unwrap();
        assert!(ws
            .default_output("cordapp")
            .ends_with("build/libs/workflows-cordapp.jar"));
    }

    #[test]
    fn test_find_manifest_in_parent() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = create_test_workspace(tmp.path());
        let nested = tmp.path().join("workflows").join("src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_manifest(&nested), Some(manifest_path));
        assert_eq!(find_manifest(Path::new("/nonexistent-cordpack-dir")), None);
    }
}
