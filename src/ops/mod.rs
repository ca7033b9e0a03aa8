//! High-level operations.
//!
//! This module contains the implementation of cordpack commands.

pub mod package;

pub use package::{package, packager_options, plan_package, PackOptions, PackageResult};
