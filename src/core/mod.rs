//! Core data structures for cordpack.
//!
//! This module contains the model of an already-resolved build:
//! - Dependencies and named configurations
//! - The project graph and the resolver seam the packager reads through
//! - The Cordpack.toml manifest and `[cordapp]` settings
//! - Workspace paths

pub mod configuration;
pub mod dependency;
pub mod graph;
pub mod manifest;
pub mod resolver;
pub mod settings;
pub mod workspace;

pub use configuration::{ConfigurationName, PLATFORM_CONFIGURATIONS};
pub use dependency::{ArtifactKey, Dependency, DependencyId};
pub use graph::{ProjectGraph, ProjectId, ProjectNode};
pub use manifest::{Manifest, ManifestError};
pub use resolver::DependencyResolver;
pub use settings::{CordappInfo, CordappSettings, SettingsError};
pub use workspace::{find_manifest, Workspace, MANIFEST_NAME};
