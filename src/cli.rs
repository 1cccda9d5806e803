//! CLI argument parsing for protosort.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use protosort::cli::Cli;
//!
//! let cli = Cli::parse();
//! let folder = cli.folder.clone().unwrap_or_else(|| ".".into());
//! let config = cli.to_config(folder).expect("Invalid configuration");
//! println!("Processing {}", config.folder.display());
//! ```

use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{Config, MergeMode};
use crate::error::{ProtoSortError, Result};

/// Sort a folder of calibration protocol PDFs.
///
/// Sirius batches are merged per measurement phase in slot order; every
/// protocol is then renamed to `<unit id>_<serial>[_phase].pdf`.
#[derive(Parser, Debug)]
#[command(name = "protosort")]
#[command(version)]
#[command(about = "Merge and rename calibration protocol PDFs", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Folder holding one batch of protocol PDFs
    ///
    /// When omitted, the folder is asked for on standard input.
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Dry run - show planned merges and renames without touching the folder
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show the slot and phase of every protocol
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// When to merge the batch
    ///
    /// - auto: merge only if a protocol mentions Sirius (default)
    /// - always: merge every batch
    /// - never: only rename
    #[arg(short, long, value_name = "MODE", default_value = "auto")]
    #[arg(value_parser = ["auto", "always", "never"])]
    pub merge: String,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config for `folder`.
    ///
    /// The folder is passed in because it may come from the prompt rather
    /// than the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoSortError::FolderNotFound`] or
    /// [`ProtoSortError::NotADirectory`] for a bad folder and
    /// [`ProtoSortError::InvalidConfig`] for anything else.
    pub fn to_config(&self, folder: PathBuf) -> Result<Config> {
        let merge_mode = MergeMode::from_str(&self.merge)?;

        let config = Config {
            folder,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            merge_mode,
            json: self.json,
        };

        config.validate().map_err(|e| match e.downcast::<ProtoSortError>() {
            Ok(err) => err,
            Err(e) => {
                ProtoSortError::invalid_config(format!("Configuration validation failed: {e}"))
            }
        })?;

        Ok(config)
    }
}

/// Ask for the batch folder on `input`, writing the question to `output`.
///
/// Returns `None` when the answer is empty or input is closed. Surrounding
/// whitespace and quotes (as left by drag-and-drop) are stripped.
///
/// # Errors
///
/// Fails if the prompt cannot be written or the answer cannot be read.
pub fn prompt_for_folder<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<PathBuf>> {
    write!(output, "Folder with protocol PDFs: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    let answer = answer.trim().trim_matches(|c| c == '"' || c == '\'');
    if answer.is_empty() {
        return Ok(None);
    }

    Ok(Some(PathBuf::from(answer)))
}
