//! cordpack - packages CorDapps into semi-fat archives
//!
//! This crate provides the core library functionality for cordpack:
//! a model of an already-resolved build, the dependency filter that
//! decides which files are bundled, and the jar writer that merges them.

pub mod archive;
pub mod core;
pub mod ops;
pub mod packager;
pub mod util;

/// Test utilities for cordpack unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a builder for synthetic project graphs and jar helpers.
#[cfg(test)]
pub mod test_support;

pub use core::{
    dependency::Dependency, graph::ProjectGraph, graph::ProjectId, manifest::Manifest,
    resolver::DependencyResolver, workspace::Workspace,
};

pub use packager::{compute_packaged_files, FilterMode, PackageOptions, PackagePlan};
pub use util::context::GlobalContext;
