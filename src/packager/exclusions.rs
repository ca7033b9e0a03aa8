//! Dependencies the ledger runtime provides and must not be bundled.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use anyhow::Result;

use crate::core::{
    ArtifactKey, ConfigurationName, Dependency, DependencyId, DependencyResolver, ProjectId,
    PLATFORM_CONFIGURATIONS,
};

/// Runtime-support libraries supplied by the node, as `(group, name)`.
pub const HARD_EXCLUDES: &[(&str, &str)] = &[
    ("org.jetbrains.kotlin", "kotlin-stdlib"),
    ("org.jetbrains.kotlin", "kotlin-stdlib-jre8"),
    ("org.jetbrains.kotlin", "kotlin-stdlib-jdk8"),
    ("org.jetbrains.kotlin", "kotlin-stdlib-jdk7"),
    ("org.jetbrains.kotlin", "kotlin-stdlib-common"),
    ("org.jetbrains.kotlin", "kotlin-reflect"),
    ("co.paralleluniverse", "quasar-core"),
];

/// Group prefix reserved for platform components.
pub const RESERVED_GROUP_PREFIX: &str = "net.corda";

/// Whether a dependency is in the hard-exclude table.
pub fn is_hard_excluded(dep: &Dependency) -> bool {
    let key = dep.key();
    HARD_EXCLUDES
        .iter()
        .any(|&(group, name)| key == ArtifactKey { group, name })
}

/// Whether a group lies in the reserved platform namespace.
pub fn is_reserved_group(group: &str) -> bool {
    group.starts_with(RESERVED_GROUP_PREFIX)
}

/// Platform-provided dependencies of one project, plus the hard-exclude table.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    platform: HashSet<DependencyId>,
}

impl ExclusionSet {
    /// Gather the dependencies of every platform-provided configuration.
    pub fn collect<R>(resolver: &R, project: ProjectId) -> Result<Self>
    where
        R: DependencyResolver + ?Sized,
    {
        let mut platform = HashSet::new();
        for configuration in PLATFORM_CONFIGURATIONS {
            for dep in resolver.list_dependencies(project, configuration)? {
                platform.insert(dep.id());
            }
        }

        tracing::debug!("{} platform-provided dependencies", platform.len());
        Ok(ExclusionSet { platform })
    }

    /// Whether `dep` is declared by a platform-provided configuration.
    pub fn is_platform_provided(&self, dep: &Dependency) -> bool {
        self.platform.contains(&dep.id())
    }

    /// Whether `dep` must be left out of the archive.
    pub fn excludes(&self, dep: &Dependency) -> bool {
        self.is_platform_provided(dep) || is_hard_excluded(dep)
    }

    pub fn len(&self) -> usize {
        self.platform.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platform.is_empty()
    }

    /// Files that excluded entries of `configuration` resolve to.
    ///
    /// Two identities can resolve to the same physical file, so callers
    /// subtract these after materializing the kept dependencies.
    pub fn excluded_files<R>(
        &self,
        resolver: &R,
        project: ProjectId,
        configuration: ConfigurationName,
    ) -> Result<BTreeSet<PathBuf>>
    where
        R: DependencyResolver + ?Sized,
    {
        let excluded: Vec<Dependency> = resolver
            .list_dependencies(project, configuration)?
            .into_iter()
            .filter(|dep| self.excludes(dep))
            .collect();

        resolver.resolve_to_files(project, configuration, &excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::GraphBuilder;

    #[test]
    fn test_hard_excludes_ignore_version() {
        let stdlib = Dependency::new("org.jetbrains.kotlin", "kotlin-stdlib").with_version("1.2.71");
        let quasar = Dependency::new("co.paralleluniverse", "quasar-core");
        let other = Dependency::new("org.jetbrains.kotlin", "kotlin-test");

        assert!(is_hard_excluded(&stdlib));
        assert!(is_hard_excluded(&quasar));
        assert!(!is_hard_excluded(&other));
    }

    #[test]
    fn test_reserved_group() {
        assert!(is_reserved_group("net.corda"));
        assert!(is_reserved_group("net.corda.core"));
        assert!(!is_reserved_group("com.example"));
    }

    #[test]
    fn test_collect_platform_configurations() {
        let mut builder = GraphBuilder::new();
        let app = builder.project("app");
        builder
            .dep(app, ConfigurationName::Cordapp, "com.example", "other-cordapp", &["other.jar"])
            .dep(app, ConfigurationName::CordaCompile, "net.corda", "corda-core", &["core.jar"])
            .dep(app, ConfigurationName::CordaRuntime, "net.corda", "corda-node-api", &["node-api.jar"])
            .dep(app, ConfigurationName::Runtime, "com.google.guava", "guava", &["guava.jar"]);
        let graph = builder.build();

        let exclusions = ExclusionSet::collect(&graph, app).unwrap();
        assert_eq!(exclusions.len(), 3);
        assert!(exclusions.excludes(&Dependency::new("net.corda", "corda-core").with_version("1.0")));
        assert!(!exclusions.excludes(&Dependency::new("com.google.guava", "guava").with_version("1.0")));
    }
}
