//! The seam between the packager and a dependency-resolution engine.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::configuration::ConfigurationName;
use crate::core::dependency::Dependency;
use crate::core::graph::ProjectId;

/// Read-only access to an already-resolved build.
///
/// Implementations answer questions about one project at a time; sub-projects
/// are reached through [`Dependency::project`].
pub trait DependencyResolver {
    /// Name of a project, used to recognize its archive among resolved files.
    fn project_name(&self, project: ProjectId) -> Result<&str>;

    /// Declared dependencies of a configuration, in declaration order.
    fn list_dependencies(
        &self,
        project: ProjectId,
        configuration: ConfigurationName,
    ) -> Result<Vec<Dependency>>;

    /// Materialize a subset of a configuration's dependencies to files.
    ///
    /// Dependencies not declared in `configuration` contribute nothing.
    fn resolve_to_files(
        &self,
        project: ProjectId,
        configuration: ConfigurationName,
        dependencies: &[Dependency],
    ) -> Result<BTreeSet<PathBuf>>;

    /// The file produced by the project's archive task.
    ///
    /// `None` when the project declares no archive or it has not been built.
    fn archive_output(&self, project: ProjectId) -> Result<Option<PathBuf>>;
}
