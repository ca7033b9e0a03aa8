//! `cordpack tree` command

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::cli::TreeArgs;
use crate::commands::load_workspace;
use cordpack::core::{ProjectGraph, ProjectId};
use cordpack::util::fs::display_path;

pub fn execute(args: TreeArgs) -> Result<()> {
    let (_ctx, ws, _config) = load_workspace(&args.manifest)?;

    for line in render_tree(ws.graph(), ws.root(), ws.root_project())? {
        println!("{}", line);
    }

    if ws.graph().has_cycle() {
        eprintln!("warning: the project graph contains a cycle");
    }

    Ok(())
}

/// Render the sub-project tree below `project`, one line per node.
fn render_tree(graph: &ProjectGraph, root: &Path, project: ProjectId) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut seen = HashSet::new();
    render_node(graph, root, project, "", None, &mut seen, &mut lines)?;
    Ok(lines)
}

/// `is_last` is `None` for the top-level project.
fn render_node(
    graph: &ProjectGraph,
    root: &Path,
    project: ProjectId,
    indent: &str,
    is_last: Option<bool>,
    seen: &mut HashSet<ProjectId>,
    lines: &mut Vec<String>,
) -> Result<()> {
    let node = graph.node(project)?;
    let is_duplicate = !seen.insert(project);

    let (branch, child_indent) = match is_last {
        None => (String::new(), String::new()),
        Some(true) => (format!("{}└── ", indent), format!("{}    ", indent)),
        Some(false) => (format!("{}├── ", indent), format!("{}│   ", indent)),
    };

    let archive = node
        .archive()
        .map(|a| format!(" [{}]", display_path(root, a)))
        .unwrap_or_default();
    let dup_marker = if is_duplicate { " (*)" } else { "" };

    lines.push(format!("{}{}{}{}", branch, node.name(), archive, dup_marker));

    // Don't recurse into duplicates
    if is_duplicate {
        return Ok(());
    }

    let subs = graph.sub_projects(project);
    let count = subs.len();
    for (i, sub) in subs.into_iter().enumerate() {
        render_node(graph, root, sub, &child_indent, Some(i + 1 == count), seen, lines)?;
    }

    Ok(())
}
