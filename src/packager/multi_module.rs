//! Recursive filtering across sub-projects.
//!
//! Plain dependencies contribute every file they resolve to. A dependency on
//! a sibling project contributes that project's archive, found two ways: the
//! resolved file whose name carries the project name, and the project's own
//! archive output. The walk then descends into the sibling's
//! `runtimeClasspath`.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{ConfigurationName, Dependency, DependencyResolver, ProjectId};
use crate::packager::exclusions::{is_reserved_group, ExclusionSet};
use crate::packager::{MissingArtifactPolicy, PackagePlan, PackagerError, SkippedArtifact};

const CLASSPATH: ConfigurationName = ConfigurationName::RuntimeClasspath;

pub(super) fn filter<R>(
    resolver: &R,
    project: ProjectId,
    exclusions: &ExclusionSet,
    policy: MissingArtifactPolicy,
) -> Result<PackagePlan>
where
    R: DependencyResolver + ?Sized,
{
    let mut walk = Walk {
        resolver,
        exclusions,
        policy,
        visited: HashSet::from([project]),
        stack: vec![project],
        plan: PackagePlan::default(),
        excluded: BTreeSet::new(),
    };

    let project_name = resolver.project_name(project)?;
    for dep in walk.kept_dependencies(project)? {
        if is_reserved_group(dep.group()) {
            walk.plan.warn_reserved(project_name, &dep);
        }
        walk.visit_dependency(project, &dep)?;
    }

    let Walk {
        mut plan, excluded, ..
    } = walk;
    plan.files = plan.files.difference(&excluded).cloned().collect();
    Ok(plan)
}

struct Walk<'a, R: ?Sized> {
    resolver: &'a R,
    exclusions: &'a ExclusionSet,
    policy: MissingArtifactPolicy,
    /// Projects already descended into
    visited: HashSet<ProjectId>,
    /// Projects on the current descent path
    stack: Vec<ProjectId>,
    plan: PackagePlan,
    /// Files resolved for excluded entries anywhere in the walk
    excluded: BTreeSet<PathBuf>,
}

impl<R> Walk<'_, R>
where
    R: DependencyResolver + ?Sized,
{
    /// `runtimeClasspath` of `project` minus excluded entries.
    fn kept_dependencies(&mut self, project: ProjectId) -> Result<Vec<Dependency>> {
        let excluded = self
            .exclusions
            .excluded_files(self.resolver, project, CLASSPATH)?;
        self.excluded.extend(excluded);

        Ok(self
            .resolver
            .list_dependencies(project, CLASSPATH)?
            .into_iter()
            .filter(|dep| {
                let excluded = self.exclusions.excludes(dep);
                if excluded {
                    tracing::debug!("excluding {} from project {}", dep, project);
                }
                !excluded
            })
            .collect())
    }

    fn visit_dependency(&mut self, owner: ProjectId, dep: &Dependency) -> Result<()> {
        let resolver = self.resolver;
        let resolved = resolver.resolve_to_files(owner, CLASSPATH, std::slice::from_ref(dep))?;

        let Some(sub) = dep.project() else {
            self.plan.files.extend(resolved);
            return Ok(());
        };

        let sub_name = resolver.project_name(sub)?;
        if self.stack.contains(&sub) {
            tracing::warn!(
                "project `{}` depends on itself through its sub-projects",
                sub_name
            );
            return Ok(());
        }

        let mut found = false;

        if let Some(file) = find_project_archive(&resolved, sub_name) {
            tracing::debug!("using {} for project `{}`", file.display(), sub_name);
            self.plan.files.insert(file.to_path_buf());
            found = true;
        }

        if let Some(archive) = resolver.archive_output(sub)? {
            self.plan.files.insert(archive);
            found = true;
        }

        if !found {
            let owner_name = resolver.project_name(owner)?;
            match self.policy {
                MissingArtifactPolicy::Fail => {
                    return Err(PackagerError::MissingArtifact {
                        project: sub_name.to_string(),
                        required_by: owner_name.to_string(),
                    }
                    .into())
                }
                MissingArtifactPolicy::Skip => {
                    tracing::warn!(
                        "no archive found for project `{}` (required by `{}`), skipping",
                        sub_name,
                        owner_name
                    );
                    self.plan.skipped.push(SkippedArtifact {
                        project: sub_name.to_string(),
                        required_by: owner_name.to_string(),
                    });
                }
            }
        }

        self.descend(sub)
    }

    fn descend(&mut self, project: ProjectId) -> Result<()> {
        if !self.visited.insert(project) {
            return Ok(());
        }

        self.stack.push(project);
        for dep in self.kept_dependencies(project)? {
            self.visit_dependency(project, &dep)?;
        }
        self.stack.pop();

        Ok(())
    }
}

/// Pick the resolved file that is the named project's archive.
///
/// A file name starting with the project name wins over one that merely
/// contains it.
fn find_project_archive<'f>(files: &'f BTreeSet<PathBuf>, project: &str) -> Option<&'f Path> {
    let named = |f: &&PathBuf| {
        f.file_name()
            .map(|n| n.to_string_lossy().into_owned())
    };

    files
        .iter()
        .find(|f| named(f).is_some_and(|n| n.starts_with(project)))
        .or_else(|| {
            files
                .iter()
                .find(|f| named(f).is_some_and(|n| n.contains(project)))
        })
        .map(PathBuf::as_path)
}
