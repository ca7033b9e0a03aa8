//! Test utilities for cordpack unit tests.
//!
//! [`GraphBuilder`] assembles synthetic project graphs so the packager can be
//! exercised without a manifest on disk. Every binary dependency gets version
//! `1.0`, so the same `(group, name)` declared in two configurations is the
//! same dependency identity.
//!
//! ```rust,ignore
//! let mut builder = GraphBuilder::new();
//! let app = builder.project("app");
//! builder.dep(app, ConfigurationName::Runtime, "com.google.guava", "guava", &["guava.jar"]);
//! let graph = builder.build();
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{ConfigurationName, Dependency, ProjectGraph, ProjectId};

/// Group assigned to every project created by [`GraphBuilder::project`].
pub const TEST_GROUP: &str = "com.example";

/// Version assigned to every binary dependency.
pub const TEST_VERSION: &str = "1.0";

/// Builder for synthetic [`ProjectGraph`]s.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ProjectGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    /// Add a project.
    pub fn project(&mut self, name: &str) -> ProjectId {
        self.graph.add_project(name, TEST_GROUP).unwrap()
    }

    /// Set a project's archive output.
    pub fn archive(&mut self, project: ProjectId, path: &str) -> &mut Self {
        self.graph.set_archive(project, path).unwrap();
        self
    }

    /// Add a binary dependency resolving to `files`.
    pub fn dep(
        &mut self,
        project: ProjectId,
        configuration: ConfigurationName,
        group: &str,
        name: &str,
        files: &[&str],
    ) -> &mut Self {
        let dep = Dependency::new(group, name).with_version(TEST_VERSION);
        self.graph
            .add_dependency(project, configuration, dep, to_paths(files))
            .unwrap();
        self
    }

    /// Add a dependency on another project resolving to `files`.
    pub fn project_dep(
        &mut self,
        project: ProjectId,
        configuration: ConfigurationName,
        target: ProjectId,
        files: &[&str],
    ) -> &mut Self {
        let name = self.graph.node(target).unwrap().name().to_string();
        let dep = Dependency::on_project(TEST_GROUP, name, target);
        self.graph
            .add_dependency(project, configuration, dep, to_paths(files))
            .unwrap();
        self
    }

    pub fn build(self) -> ProjectGraph {
        self.graph
    }
}

fn to_paths(files: &[&str]) -> Vec<PathBuf> {
    files.iter().map(PathBuf::from).collect()
}

/// Write a jar at `path` containing the given `(entry name, contents)` pairs.
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }

    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// List the entry names of a jar in archive order.
pub fn jar_entries(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
