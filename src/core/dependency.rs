//! Dependency declarations.
//!
//! A Dependency names a required artifact by group and name, optionally
//! pinned to a version, and optionally linked to a sub-project whose build
//! output stands in for a resolved file.

use std::fmt;

use serde::Serialize;

use crate::core::graph::ProjectId;

/// Identity used for set difference between configurations.
///
/// Two dependencies are the same entry when group, name and version match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyId {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
}

/// A `(group, name)` pair, ignoring version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactKey<'a> {
    pub group: &'a str,
    pub name: &'a str,
}

/// A declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Group (empty when absent)
    group: String,

    /// Artifact name
    name: String,

    /// Version, if declared
    version: Option<String>,

    /// Sub-project satisfying this dependency
    project: Option<ProjectId>,
}

impl Dependency {
    /// Create a dependency on a binary artifact.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Dependency {
            group: group.into(),
            name: name.into(),
            version: None,
            project: None,
        }
    }

    /// Create a dependency satisfied by a sibling project.
    pub fn on_project(group: impl Into<String>, name: impl Into<String>, project: ProjectId) -> Self {
        Dependency::new(group, name).with_project(project)
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Link this dependency to a sub-project.
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The linked sub-project, if any.
    pub fn project(&self) -> Option<ProjectId> {
        self.project
    }

    /// Whether this dependency is satisfied by a sibling project.
    pub fn is_project(&self) -> bool {
        self.project.is_some()
    }

    /// Get the identity tuple used for set difference.
    pub fn id(&self) -> DependencyId {
        DependencyId {
            group: self.group.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    /// Get the `(group, name)` key used by the hard-exclude table.
    pub fn key(&self) -> ArtifactKey<'_> {
        ArtifactKey {
            group: &self.group,
            name: &self.name,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_includes_version() {
        let a = Dependency::new("com.google.guava", "guava").with_version("28.0");
        let b = Dependency::new("com.google.guava", "guava").with_version("29.0");

        assert_ne!(a.id(), b.id());
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_display() {
        let dep = Dependency::new("org.jetbrains.kotlin", "kotlin-stdlib").with_version("1.2.71");
        assert_eq!(dep.to_string(), "org.jetbrains.kotlin:kotlin-stdlib:1.2.71");

        let unversioned = Dependency::new("", "local");
        assert_eq!(unversioned.to_string(), ":local");
    }
}
