//! Command implementations

pub mod completions;
pub mod files;
pub mod package;
pub mod tree;

use anyhow::Result;

use crate::cli::{FilterArgs, ManifestArgs};
use cordpack::core::Workspace;
use cordpack::ops::PackOptions;
use cordpack::packager::PackagePlan;
use cordpack::util::diagnostic::{emit, suggestions, Diagnostic};
use cordpack::util::{Config, GlobalContext};

/// Locate and load the workspace and its configuration.
pub fn load_workspace(args: &ManifestArgs) -> Result<(GlobalContext, Workspace, Config)> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.manifest_path(args.manifest_path.as_deref())?;
    let ws = Workspace::new(&manifest_path)?;
    let config = ctx.config(ws.root());
    Ok((ctx, ws, config))
}

impl From<&FilterArgs> for PackOptions {
    fn from(args: &FilterArgs) -> Self {
        PackOptions {
            multi_module: args.multi_module,
            fail_on_missing: args.fail_on_missing,
            output: None,
        }
    }
}

/// Summarize sub-projects that contributed nothing.
pub fn report_skipped(plan: &PackagePlan) {
    if plan.skipped.is_empty() {
        return;
    }

    let mut diag = Diagnostic::warning(format!(
        "{} sub-project archive(s) could not be found and were skipped",
        plan.skipped.len()
    ));
    for skipped in &plan.skipped {
        diag = diag.with_context(format!(
            "`{}` (required by `{}`)",
            skipped.project, skipped.required_by
        ));
    }
    diag = diag
        .with_suggestion("Pass `--fail-on-missing` to make this an error")
        .with_suggestion(suggestions::INSPECT_SELECTION);

    emit(&diag, false);
}
