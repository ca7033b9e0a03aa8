//! `cordpack package` command

use anyhow::Result;

use crate::cli::PackageArgs;
use crate::commands::{load_workspace, report_skipped};
use cordpack::ops::{package, PackOptions};
use cordpack::util::fs::display_path;

pub fn execute(args: PackageArgs) -> Result<()> {
    let (ctx, ws, config) = load_workspace(&args.manifest)?;

    let opts = PackOptions {
        output: args.output.map(|p| ctx.cwd().join(p)),
        ..PackOptions::from(&args.filter)
    };

    eprintln!("   Packaging {}", ws.root_project_name());

    let result = package(&ws, &config, &opts)?;
    report_skipped(&result.plan);

    eprintln!(
        "    Finished {} ({} dependencies, {} entries)",
        display_path(ctx.cwd(), &result.archive.path),
        result.plan.files.len(),
        result.archive.entries
    );
    eprintln!("      SHA256 {}", result.archive.sha256);

    Ok(())
}
