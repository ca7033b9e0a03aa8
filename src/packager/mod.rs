//! Dependency filtering for semi-fat CorDapp archives.
//!
//! Given a project in an already-resolved build, decide which files are
//! merged into its archive. Anything the ledger runtime provides is left out:
//! dependencies declared in the platform-provided configurations and the
//! runtime-support libraries in [`exclusions::HARD_EXCLUDES`].
//!
//! Two strategies exist because single-project and multi-module builds
//! expose dependency information differently:
//! - [`FilterMode::Direct`] filters the flat `runtime` configuration.
//! - [`FilterMode::MultiModule`] walks `runtimeClasspath` and discovers the
//!   archives of sibling projects recursively.

mod direct;
pub mod errors;
pub mod exclusions;
mod multi_module;

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{Dependency, DependencyId, DependencyResolver, ProjectId};

pub use errors::PackagerError;
pub use exclusions::{is_hard_excluded, is_reserved_group, ExclusionSet, HARD_EXCLUDES};

/// How dependency information is gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Flat filtering of a single project's `runtime` configuration
    #[default]
    Direct,
    /// Recursive filtering across sub-projects via `runtimeClasspath`
    MultiModule,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Direct => write!(f, "direct"),
            FilterMode::MultiModule => write!(f, "multi-module"),
        }
    }
}

/// What to do when a sub-project's archive cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArtifactPolicy {
    /// Record it and carry on; the dependency contributes nothing
    #[default]
    Skip,
    /// Abort packaging
    Fail,
}

/// Options for [`compute_packaged_files`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageOptions {
    pub mode: FilterMode,
    pub on_missing_artifact: MissingArtifactPolicy,
}

impl PackageOptions {
    pub fn new(mode: FilterMode) -> Self {
        PackageOptions {
            mode,
            on_missing_artifact: MissingArtifactPolicy::default(),
        }
    }

    pub fn with_missing_artifact_policy(mut self, policy: MissingArtifactPolicy) -> Self {
        self.on_missing_artifact = policy;
        self
    }
}

/// A dependency in the reserved platform namespace that was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformWarning {
    pub project: String,
    pub dependency: DependencyId,
}

/// A sub-project whose archive could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArtifact {
    pub project: String,
    pub required_by: String,
}

/// The outcome of filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackagePlan {
    /// Files to merge into the archive
    pub files: BTreeSet<PathBuf>,

    /// Kept dependencies in the reserved platform namespace
    pub warnings: Vec<PlatformWarning>,

    /// Sub-projects that contributed no archive
    pub skipped: Vec<SkippedArtifact>,
}

impl PackagePlan {
    /// Record and log a kept dependency from the reserved namespace.
    fn warn_reserved(&mut self, project: &str, dep: &Dependency) {
        tracing::warn!(
            "`{}` depends on `{}`, which looks like a platform component; \
             it will be bundled. Declare it in `cordaCompile` if the node provides it",
            project,
            dep
        );
        self.warnings.push(PlatformWarning {
            project: project.to_string(),
            dependency: dep.id(),
        });
    }
}

/// Compute the files to merge into `project`'s archive.
pub fn compute_packaged_files<R>(
    resolver: &R,
    project: ProjectId,
    options: &PackageOptions,
) -> Result<PackagePlan>
where
    R: DependencyResolver + ?Sized,
{
    let exclusions = ExclusionSet::collect(resolver, project)?;

    let plan = match options.mode {
        FilterMode::Direct => direct::filter(resolver, project, &exclusions)?,
        FilterMode::MultiModule => {
            multi_module::filter(resolver, project, &exclusions, options.on_missing_artifact)?
        }
    };

    tracing::info!(
        "{} files selected for `{}` ({} mode)",
        plan.files.len(),
        resolver.project_name(project)?,
        options.mode
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigurationName::{self, CordaCompile, Runtime, RuntimeClasspath};
    use crate::core::ProjectGraph;
    use crate::test_support::GraphBuilder;

    fn both_modes() -> [PackageOptions; 2] {
        [
            PackageOptions::new(FilterMode::Direct),
            PackageOptions::new(FilterMode::MultiModule),
        ]
    }

    fn files(plan: &PackagePlan) -> Vec<&str> {
        plan.files.iter().map(|p| p.to_str().unwrap()).collect()
    }

    /// Declare the same entries in `runtime` and `runtimeClasspath`.
    fn flat_dep(
        builder: &mut GraphBuilder,
        project: ProjectId,
        group: &str,
        name: &str,
        files: &[&str],
    ) {
        builder
            .dep(project, Runtime, group, name, files)
            .dep(project, RuntimeClasspath, group, name, files);
    }

    #[test]
    fn test_excluded_only_files_never_packaged() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        flat_dep(&mut builder, app, "com.google.guava", "guava", &["guava.jar"]);
        flat_dep(&mut builder, app, "net.corda", "corda-core", &["corda-core.jar", "shared.jar"]);
        flat_dep(&mut builder, app, "com.example", "util", &["util.jar", "shared.jar"]);
        builder.dep(app, CordaCompile, "net.corda", "corda-core", &[]);
        let graph = builder.build();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert!(
                !plan.files.iter().any(|f| f.ends_with("corda-core.jar")),
                "{} mode bundled a platform file",
                options.mode
            );
            assert!(
                !plan.files.iter().any(|f| f.ends_with("shared.jar")),
                "{} mode bundled a file shared with a platform dependency",
                options.mode
            );
            assert!(plan.files.iter().any(|f| f.ends_with("guava.jar")));
            assert!(plan.files.iter().any(|f| f.ends_with("util.jar")));
        }
    }

    #[test]
    fn test_version_conflict_file_removed() {
        // Both versions resolve to the conflict winner; only 1.0 is platform-provided.
        let mut graph = ProjectGraph::new();
        let app = graph.add_project("app", "com.example").unwrap();
        let old = Dependency::new("com.example", "x").with_version("1.0");
        let new = Dependency::new("com.example", "x").with_version("2.0");
        let resolved = vec![PathBuf::from("x-2.0.jar")];
        for configuration in [Runtime, RuntimeClasspath] {
            graph
                .add_dependency(app, configuration, old.clone(), resolved.clone())
                .unwrap();
            graph
                .add_dependency(app, configuration, new.clone(), resolved.clone())
                .unwrap();
        }
        graph.add_dependency(app, CordaCompile, old, Vec::new()).unwrap();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert!(plan.files.is_empty(), "{} mode: {:?}", options.mode, plan.files);
        }
    }

    #[test]
    fn test_file_shared_with_hard_excluded_dependency_removed() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        flat_dep(&mut builder, app, "org.jetbrains.kotlin", "kotlin-reflect", &["kotlin-reflect.jar", "annotations.jar"]);
        flat_dep(&mut builder, app, "com.example", "util", &["util.jar", "annotations.jar"]);
        let graph = builder.build();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert_eq!(files(&plan), vec!["util.jar"], "{} mode", options.mode);
        }
    }

    #[test]
    fn test_hard_excludes_never_packaged() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        for (group, name) in HARD_EXCLUDES {
            let file = format!("{}.jar", name);
            flat_dep(&mut builder, app, group, name, &[file.as_str()]);
        }
        flat_dep(&mut builder, app, "com.google.guava", "guava", &["guava.jar"]);
        let graph = builder.build();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert_eq!(files(&plan), vec!["guava.jar"], "{} mode", options.mode);
        }
    }

    #[test]
    fn test_idempotent() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        let lib = builder.project("lib");
        flat_dep(&mut builder, app, "com.google.guava", "guava", &["guava.jar"]);
        builder
            .project_dep(app, RuntimeClasspath, lib, &["lib/build/lib.jar"])
            .dep(lib, RuntimeClasspath, "org.slf4j", "slf4j-api", &["slf4j.jar"]);
        let graph = builder.build();

        for options in both_modes() {
            let first = compute_packaged_files(&graph, app, &options).unwrap();
            let second = compute_packaged_files(&graph, app, &options).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_modes_agree_without_sub_projects() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        flat_dep(&mut builder, app, "com.google.guava", "guava", &["guava.jar", "failureaccess.jar"]);
        flat_dep(&mut builder, app, "org.jetbrains.kotlin", "kotlin-stdlib", &["kotlin-stdlib.jar"]);
        flat_dep(&mut builder, app, "net.corda", "corda-core", &["corda-core.jar"]);
        flat_dep(&mut builder, app, "net.corda", "corda-finance", &["corda-finance.jar"]);
        builder.dep(app, CordaCompile, "net.corda", "corda-core", &[]);
        let graph = builder.build();

        let direct =
            compute_packaged_files(&graph, app, &PackageOptions::new(FilterMode::Direct)).unwrap();
        let multi =
            compute_packaged_files(&graph, app, &PackageOptions::new(FilterMode::MultiModule))
                .unwrap();

        assert_eq!(direct.files, multi.files);
        assert_eq!(
            files(&direct),
            vec!["corda-finance.jar", "failureaccess.jar", "guava.jar"]
        );
    }

    #[test]
    fn test_multi_module_includes_sub_project_archive() {
        let mut builder = GraphBuilder::new();
        let a = builder.project("a");
        let b = builder.project("b");
        builder
            .project_dep(a, RuntimeClasspath, b, &["b/build/libs/b.jar", "kotlin-stdlib.jar"])
            .dep(b, RuntimeClasspath, "org.jetbrains.kotlin", "kotlin-stdlib", &["kotlin-stdlib.jar"]);
        let graph = builder.build();

        let plan =
            compute_packaged_files(&graph, a, &PackageOptions::new(FilterMode::MultiModule))
                .unwrap();
        assert_eq!(files(&plan), vec!["b/build/libs/b.jar"]);
    }

    #[test]
    fn test_reserved_namespace_warns_but_keeps() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        flat_dep(&mut builder, app, "net.corda.core", "corda-confidential", &["confidential.jar"]);
        let graph = builder.build();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert_eq!(files(&plan), vec!["confidential.jar"]);
            assert_eq!(plan.warnings.len(), 1);
            assert_eq!(plan.warnings[0].dependency.group, "net.corda.core");
            assert_eq!(plan.warnings[0].project, "app");
        }
    }

    #[test]
    fn test_unknown_configuration_yields_nothing() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        builder.dep(app, ConfigurationName::Cordapp, "com.example", "other", &["other.jar"]);
        let graph = builder.build();

        for options in both_modes() {
            let plan = compute_packaged_files(&graph, app, &options).unwrap();
            assert!(plan.files.is_empty());
        }
    }
}
