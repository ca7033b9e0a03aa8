//! cordpack CLI - packages CorDapps into semi-fat archives

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cordpack::core::{ManifestError, SettingsError};
use cordpack::packager::PackagerError;
use cordpack::util::diagnostic::{emit, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match diagnostic_for(&e) {
            Some(diag) => emit(&diag, color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cordpack=debug")
    } else {
        EnvFilter::new("cordpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Package(args) => commands::package::execute(args),
        Commands::Files(args) => commands::files::execute(args),
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Structured diagnostics for the domain errors that have them.
fn diagnostic_for(err: &anyhow::Error) -> Option<Diagnostic> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SettingsError>() {
            Some(e.to_diagnostic())
        } else if let Some(e) = cause.downcast_ref::<ManifestError>() {
            Some(e.to_diagnostic())
        } else {
            cause
                .downcast_ref::<PackagerError>()
                .map(PackagerError::to_diagnostic)
        }
    })
}
