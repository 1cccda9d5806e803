//! Configuration module for protosort.
//!
//! CLI arguments are turned into a validated [`Config`] that drives one
//! run of the pipeline over a single batch folder.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::ProtoSortError;
use std::{path::PathBuf, str::FromStr};

/// Whether a batch is merged before renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Merge only batches that contain a Sirius protocol.
    #[default]
    Auto,
    /// Merge regardless of the batch contents.
    Always,
    /// Never merge; only rename.
    Never,
}

impl FromStr for MergeMode {
    type Err = ProtoSortError;

    /// Parse a merge mode: "auto", "always" or "never" (any case).
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(ProtoSortError::InvalidConfig {
                message: format!("Invalid merge mode: {s}. Must be one of: auto, always, never"),
            }),
        }
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Batch folder to process.
    pub folder: PathBuf,

    /// Report what would happen without writing or renaming anything.
    pub dry_run: bool,

    /// Show per-file details.
    pub verbose: bool,

    /// Print errors only.
    pub quiet: bool,

    /// Merge decision policy.
    pub merge_mode: MergeMode,

    /// Print the run report as JSON instead of text.
    pub json: bool,
}

impl Config {
    /// Build a configuration for `folder` with default options.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            dry_run: false,
            verbose: false,
            quiet: false,
            merge_mode: MergeMode::Auto,
            json: false,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if flags conflict or the folder is not an existing
    /// directory. Folder problems carry a [`ProtoSortError`] that can be
    /// recovered with `downcast`.
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if !self.folder.exists() {
            bail!(ProtoSortError::FolderNotFound {
                path: self.folder.clone(),
            });
        }

        if !self.folder.is_dir() {
            bail!(ProtoSortError::NotADirectory {
                path: self.folder.clone(),
            });
        }

        Ok(())
    }

    /// Check if non-error output should be printed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
