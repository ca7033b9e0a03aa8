//! `cordpack package` and `cordpack files` operations.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::archive::{ArchiveSummary, JarWriter};
use crate::core::Workspace;
use crate::packager::{
    compute_packaged_files, FilterMode, MissingArtifactPolicy, PackageOptions, PackagePlan,
};
use crate::util::Config;

/// Options for packaging.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    /// Force multi-module filtering regardless of `[cordapp]`
    pub multi_module: bool,

    /// Fail when a sub-project archive cannot be found
    pub fail_on_missing: bool,

    /// Where to write the archive (defaults to `build/libs/<project>-<suffix>.jar`)
    pub output: Option<PathBuf>,
}

/// Result of a successful `package`.
#[derive(Debug, Clone)]
pub struct PackageResult {
    pub plan: PackagePlan,
    pub archive: ArchiveSummary,
}

/// Combine CLI flags, manifest settings and config into packager options.
///
/// Precedence: CLI flag, then `[cordapp]`, then config file, then default.
pub fn packager_options(ws: &Workspace, config: &Config, opts: &PackOptions) -> PackageOptions {
    let settings = ws.settings();

    let mode = if opts.multi_module {
        FilterMode::MultiModule
    } else {
        settings.filter_mode()
    };

    let policy = if opts.fail_on_missing {
        MissingArtifactPolicy::Fail
    } else {
        settings
            .on_missing_artifact
            .or(config.package.on_missing_artifact)
            .unwrap_or_default()
    };

    PackageOptions::new(mode).with_missing_artifact_policy(policy)
}

/// Validate settings and compute the files to package.
pub fn plan_package(ws: &Workspace, config: &Config, opts: &PackOptions) -> Result<PackagePlan> {
    let settings = ws.settings();
    settings.validate()?;

    tracing::debug!(
        "target platform {}, minimum platform {}, sealed: {}",
        settings.target_platform_version.unwrap_or_default(),
        settings.minimum_platform_version(),
        settings.sealing
    );

    let options = packager_options(ws, config, opts);
    compute_packaged_files(ws.graph(), ws.root_project(), &options)
}

/// Compute the files to package and write the archive.
pub fn package(ws: &Workspace, config: &Config, opts: &PackOptions) -> Result<PackageResult> {
    let plan = plan_package(ws, config, opts)?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| ws.default_output(config.output_suffix()));
    let base = ws.graph().node(ws.root_project())?.archive();

    if base == Some(output.as_path()) {
        bail!(
            "output {} would overwrite the project archive",
            output.display()
        );
    }

    let writer = JarWriter::new().with_extra_excludes(&config.package.exclude_paths)?;
    let archive = writer.write(&output, base, &plan.files)?;

    Ok(PackageResult { plan, archive })
}
