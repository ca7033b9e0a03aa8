//! Flat filtering of a single project's `runtime` configuration.

use anyhow::Result;

use crate::core::{ConfigurationName, DependencyResolver, ProjectId};
use crate::packager::exclusions::{is_hard_excluded, is_reserved_group, ExclusionSet};
use crate::packager::PackagePlan;

pub(super) fn filter<R>(
    resolver: &R,
    project: ProjectId,
    exclusions: &ExclusionSet,
) -> Result<PackagePlan>
where
    R: DependencyResolver + ?Sized,
{
    let project_name = resolver.project_name(project)?;
    let mut plan = PackagePlan::default();

    let mut kept = Vec::new();
    for dep in resolver.list_dependencies(project, ConfigurationName::Runtime)? {
        if exclusions.is_platform_provided(&dep) {
            tracing::debug!("excluding platform-provided dependency {}", dep);
            continue;
        }
        if is_hard_excluded(&dep) {
            tracing::debug!("excluding runtime-support library {}", dep);
            continue;
        }
        if is_reserved_group(dep.group()) {
            plan.warn_reserved(project_name, &dep);
        }
        kept.push(dep);
    }

    let included = resolver.resolve_to_files(project, ConfigurationName::Runtime, &kept)?;
    let excluded = exclusions.excluded_files(resolver, project, ConfigurationName::Runtime)?;

    plan.files = included.difference(&excluded).cloned().collect();
    Ok(plan)
}
