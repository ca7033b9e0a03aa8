//! `cordpack files` command
//!
//! Prints the files `cordpack package` would merge, one per line, relative to
//! the workspace root when possible.

use anyhow::Result;

use crate::cli::FilesArgs;
use crate::commands::{load_workspace, report_skipped};
use cordpack::ops::{plan_package, PackOptions};
use cordpack::util::fs::display_path;

pub fn execute(args: FilesArgs) -> Result<()> {
    let (_ctx, ws, config) = load_workspace(&args.manifest)?;

    let plan = plan_package(&ws, &config, &PackOptions::from(&args.filter))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for file in &plan.files {
        println!("{}", display_path(ws.root(), file));
    }
    report_skipped(&plan);

    Ok(())
}
