//! Cordpack.toml manifest parsing.
//!
//! The manifest is an export of an already-resolved build: every project,
//! its archive output, and for each configuration the declared dependencies
//! together with the files the resolver materialized for them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::configuration::ConfigurationName;
use crate::core::dependency::Dependency;
use crate::core::graph::{ProjectGraph, ProjectId};
use crate::core::settings::CordappSettings;
use crate::util::diagnostic::Diagnostic;

/// Structural errors in a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest declares no [[project]] entries")]
    NoProjects,

    #[error("root project `{0}` is not declared")]
    UnknownRoot(String),

    #[error("project `{referenced_by}` depends on undeclared project `{project}`")]
    UnknownProject {
        project: String,
        referenced_by: String,
    },

    #[error("dependency in `{project}` ({configuration}) has neither `name` nor `project`")]
    MissingDependencyName {
        project: String,
        configuration: ConfigurationName,
    },
}

impl ManifestError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ManifestError::NoProjects => {
                diag.with_suggestion("Add a [[project]] table with at least a `name`")
            }
            ManifestError::UnknownRoot(_) => {
                diag.with_suggestion("Set `root` to the name of a declared [[project]]")
            }
            ManifestError::UnknownProject { project, .. } => diag.with_suggestion(format!(
                "Declare `{}` as a [[project]] or depend on its published artifact",
                project
            )),
            ManifestError::MissingDependencyName { .. } => diag
                .with_suggestion("Give the dependency a `name`, or link it with `project = \"...\"`"),
        }
    }
}

/// The parsed Cordpack.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// `[cordapp]` settings
    pub cordapp: CordappSettings,

    /// All declared projects
    pub graph: ProjectGraph,

    /// The project being packaged
    pub root: ProjectId,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawManifest {
    #[serde(default)]
    root: Option<String>,

    #[serde(default)]
    cordapp: CordappSettings,

    #[serde(default, rename = "project")]
    projects: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,

    #[serde(default)]
    group: String,

    #[serde(default)]
    archive: Option<PathBuf>,

    #[serde(default)]
    configurations: BTreeMap<String, RawConfiguration>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfiguration {
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    #[serde(default)]
    group: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    version: Option<String>,

    /// Name of the sibling project satisfying this dependency
    #[serde(default)]
    project: Option<String>,

    #[serde(default)]
    files: Vec<PathBuf>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        Self::parse(&contents, manifest_dir)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest contents. Relative paths resolve against `manifest_dir`.
    pub fn parse(contents: &str, manifest_dir: PathBuf) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents)?;

        if raw.projects.is_empty() {
            return Err(ManifestError::NoProjects.into());
        }

        let mut graph = ProjectGraph::new();

        // Declare every project first so dependencies can reference later entries.
        let mut ids = Vec::with_capacity(raw.projects.len());
        for project in &raw.projects {
            let id = graph.add_project(&project.name, &project.group)?;
            if let Some(archive) = &project.archive {
                graph.set_archive(id, absolutize(&manifest_dir, archive))?;
            }
            ids.push(id);
        }

        for (project, &id) in raw.projects.iter().zip(&ids) {
            for (config_name, config) in &project.configurations {
                let configuration: ConfigurationName = config_name
                    .parse()
                    .with_context(|| format!("in project `{}`", project.name))?;
                graph.declare_configuration(id, configuration)?;

                for raw_dep in &config.dependencies {
                    let dep = to_dependency(&graph, project, configuration, raw_dep)?;
                    let files = raw_dep
                        .files
                        .iter()
                        .map(|f| absolutize(&manifest_dir, f))
                        .collect();
                    graph.add_dependency(id, configuration, dep, files)?;
                }
            }
        }

        let root = match &raw.root {
            Some(name) => graph
                .find(name)
                .ok_or_else(|| ManifestError::UnknownRoot(name.clone()))?,
            None => ids[0],
        };

        Ok(Manifest {
            cordapp: raw.cordapp,
            graph,
            root,
            manifest_dir,
        })
    }

    /// Name of the root project.
    pub fn root_name(&self) -> &str {
        self.graph
            .node(self.root)
            .map(|n| n.name())
            .unwrap_or_default()
    }
}

fn to_dependency(
    graph: &ProjectGraph,
    owner: &RawProject,
    configuration: ConfigurationName,
    raw: &RawDependency,
) -> Result<Dependency> {
    let mut dep = match &raw.project {
        Some(project_name) => {
            let id = graph
                .find(project_name)
                .ok_or_else(|| ManifestError::UnknownProject {
                    project: project_name.clone(),
                    referenced_by: owner.name.clone(),
                })?;
            let node = graph.node(id)?;
            let group = raw.group.clone().unwrap_or_else(|| node.group().to_string());
            let name = raw.name.clone().unwrap_or_else(|| node.name().to_string());
            Dependency::on_project(group, name, id)
        }
        None => {
            let name = raw
                .name
                .clone()
                .ok_or_else(|| ManifestError::MissingDependencyName {
                    project: owner.name.clone(),
                    configuration,
                })?;
            Dependency::new(raw.group.clone().unwrap_or_default(), name)
        }
    };

    if let Some(version) = &raw.version {
        dep = dep.with_version(version);
    }

    Ok(dep)
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
