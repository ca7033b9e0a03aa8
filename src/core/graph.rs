//! ProjectGraph - the read-only model of a multi-project build.
//!
//! Each node is a buildable project with its named configurations and
//! optional archive output. An edge `a -> b` means some configuration of
//! `a` has a dependency satisfied by project `b`.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::configuration::ConfigurationName;
use crate::core::dependency::{Dependency, DependencyId};
use crate::core::resolver::DependencyResolver;

/// Index of a project in a [`ProjectGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(NodeIndex);

impl ProjectId {
    pub fn index(&self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.index())
    }
}

/// A dependency together with the files the resolver materialized for it.
#[derive(Debug, Clone)]
pub struct ConfigurationEntry {
    pub dependency: Dependency,
    pub files: Vec<PathBuf>,
}

/// An ordered list of resolved dependency entries.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    entries: Vec<ConfigurationEntry>,
}

impl Configuration {
    pub fn entries(&self) -> &[ConfigurationEntry] {
        &self.entries
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter().map(|e| &e.dependency)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single project in the build.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    name: String,
    group: String,
    archive: Option<PathBuf>,
    configurations: HashMap<ConfigurationName, Configuration>,
}

impl ProjectNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// The file produced by this project's archive task, if declared.
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    pub fn configuration(&self, name: ConfigurationName) -> Option<&Configuration> {
        self.configurations.get(&name)
    }
}

/// Arena of projects and their sub-project links.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    graph: DiGraph<ProjectNode, ()>,
    by_name: HashMap<String, ProjectId>,
}

impl ProjectGraph {
    pub fn new() -> Self {
        ProjectGraph::default()
    }

    /// Add a project. Names must be unique within the graph.
    pub fn add_project(&mut self, name: impl Into<String>, group: impl Into<String>) -> Result<ProjectId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            bail!("duplicate project `{}`", name);
        }

        let node = self.graph.add_node(ProjectNode {
            name: name.clone(),
            group: group.into(),
            archive: None,
            configurations: HashMap::new(),
        });
        let id = ProjectId(node);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Record the archive output of a project.
    pub fn set_archive(&mut self, id: ProjectId, archive: impl Into<PathBuf>) -> Result<()> {
        self.node_mut(id)?.archive = Some(archive.into());
        Ok(())
    }

    /// Declare an empty configuration so it is listed even without entries.
    pub fn declare_configuration(&mut self, id: ProjectId, name: ConfigurationName) -> Result<()> {
        self.node_mut(id)?.configurations.entry(name).or_default();
        Ok(())
    }

    /// Append a dependency and its resolved files to a configuration.
    pub fn add_dependency(
        &mut self,
        id: ProjectId,
        configuration: ConfigurationName,
        dependency: Dependency,
        files: Vec<PathBuf>,
    ) -> Result<()> {
        if let Some(target) = dependency.project() {
            self.node(target)?;
            if !self.graph.contains_edge(id.0, target.0) {
                self.graph.add_edge(id.0, target.0, ());
            }
        }

        self.node_mut(id)?
            .configurations
            .entry(configuration)
            .or_default()
            .entries
            .push(ConfigurationEntry { dependency, files });
        Ok(())
    }

    /// Get a project by id.
    pub fn node(&self, id: ProjectId) -> Result<&ProjectNode> {
        match self.graph.node_weight(id.0) {
            Some(node) => Ok(node),
            None => bail!("unknown project {}", id),
        }
    }

    fn node_mut(&mut self, id: ProjectId) -> Result<&mut ProjectNode> {
        match self.graph.node_weight_mut(id.0) {
            Some(node) => Ok(node),
            None => bail!("unknown project {}", id),
        }
    }

    /// Find a project by name.
    pub fn find(&self, name: &str) -> Option<ProjectId> {
        self.by_name.get(name).copied()
    }

    /// Iterate over all projects in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = (ProjectId, &ProjectNode)> {
        self.graph
            .node_indices()
            .map(move |n| (ProjectId(n), &self.graph[n]))
    }

    /// Projects directly linked from `id`, sorted by name.
    pub fn sub_projects(&self, id: ProjectId) -> Vec<ProjectId> {
        let mut subs: Vec<_> = self.graph.neighbors(id.0).map(ProjectId).collect();
        subs.sort_by(|a, b| self.graph[a.0].name.cmp(&self.graph[b.0].name));
        subs
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Whether any chain of sub-project links loops back on itself.
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

impl DependencyResolver for ProjectGraph {
    fn project_name(&self, project: ProjectId) -> Result<&str> {
        Ok(self.node(project)?.name())
    }

    fn list_dependencies(
        &self,
        project: ProjectId,
        configuration: ConfigurationName,
    ) -> Result<Vec<Dependency>> {
        Ok(self
            .node(project)?
            .configuration(configuration)
            .map(|c| c.dependencies().cloned().collect())
            .unwrap_or_default())
    }

    fn resolve_to_files(
        &self,
        project: ProjectId,
        configuration: ConfigurationName,
        dependencies: &[Dependency],
    ) -> Result<BTreeSet<PathBuf>> {
        let mut files = BTreeSet::new();
        let Some(config) = self.node(project)?.configuration(configuration) else {
            return Ok(files);
        };

        let wanted: HashSet<DependencyId> = dependencies.iter().map(Dependency::id).collect();
        for entry in config.entries() {
            if wanted.contains(&entry.dependency.id()) {
                files.extend(entry.files.iter().cloned());
            }
        }

        Ok(files)
    }

    fn archive_output(&self, project: ProjectId) -> Result<Option<PathBuf>> {
        let node = self.node(project)?;
        match node.archive() {
            Some(archive) if archive.is_file() => Ok(Some(archive.to_path_buf())),
            Some(archive) => {
                tracing::debug!(
                    "archive {} of project `{}` has not been built",
                    archive.display(),
                    node.name()
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
