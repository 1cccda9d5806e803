//! protosort - Merge and rename calibration protocol PDFs.

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;

use protosort::cli::{Cli, prompt_for_folder};
use protosort::error::{ProtoSortError, Result};
use protosort::output::{OutputFormatter, display_report};
use protosort::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

/// Exit code when at least one bucket could not be merged.
const EXIT_MERGE_FAILED: i32 = 6;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "protosort=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Main application logic. Returns the process exit code.
fn run(cli: Cli) -> Result<i32> {
    let Some(folder) = resolve_folder(&cli)? else {
        println!("No folder selected. Exiting...");
        return Ok(0);
    };

    let config = cli.to_config(folder)?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", protosort::NAME, protosort::VERSION));
        formatter.blank_line();
    }

    let report = Pipeline::new().run(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ProtoSortError::other(format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    } else {
        display_report(&formatter, &report);
    }

    if report.failed_merges() > 0 {
        return Ok(EXIT_MERGE_FAILED);
    }

    Ok(0)
}

fn resolve_folder(cli: &Cli) -> Result<Option<PathBuf>> {
    if let Some(folder) = &cli.folder {
        return Ok(Some(folder.clone()));
    }

    let stdin = io::stdin();
    prompt_for_folder(&mut stdin.lock(), &mut io::stdout())
}
