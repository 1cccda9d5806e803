//! Error types for protosort.
//!
//! Errors fall into two groups. Per-file problems (a PDF that will not load,
//! a page without extractable text) are recoverable: the batch keeps going
//! and the file is treated as carrying no information. Folder-level and
//! rename problems stop the current operation.

use std::io;
use std::path::PathBuf;

/// Result type alias for protosort operations.
pub type Result<T> = std::result::Result<T, ProtoSortError>;

/// Main error type for protosort operations.
#[derive(Debug, thiserror::Error)]
pub enum ProtoSortError {
    /// Target folder does not exist.
    #[error("Folder not found: {}", path.display())]
    FolderNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Target path exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// Folder listing failed (permissions, vanished directory, ...).
    #[error("Cannot read folder: {}\n  Reason: {source}", path.display())]
    FolderUnreadable {
        /// Folder being listed.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// PDF could not be opened or parsed.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF loaded but has an empty page tree.
    #[error("PDF has no pages: {}", path.display())]
    NoPages {
        /// Path to the PDF file.
        path: PathBuf,
    },

    /// Text of the first page could not be decoded.
    #[error("Failed to extract text from: {}\n  Reason: {reason}", path.display())]
    TextExtraction {
        /// Path to the PDF file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Failed to create an output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Page concatenation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Rename failed for a reason other than a name collision.
    #[error("Failed to rename {} to {}\n  Reason: {source}", from.display(), to.display())]
    RenameFailed {
        /// Original path.
        from: PathBuf,
        /// Attempted target.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Collision suffixes ran past the sanity ceiling.
    #[error("No free file name for {base} after {attempts} attempts")]
    CollisionLimit {
        /// Canonical base name that kept colliding.
        base: String,
        /// Number of names tried.
        attempts: u32,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl ProtoSortError {
    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a TextExtraction error.
    pub fn text_extraction(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::TextExtraction {
            path,
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FolderNotFound { .. } => 2,
            Self::NotADirectory { .. } => 2,
            Self::FolderUnreadable { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::NoPages { .. } => 3,
            Self::TextExtraction { .. } => 3,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::RenameFailed { .. } => 7,
            Self::CollisionLimit { .. } => 7,
            Self::InvalidConfig { .. } => 1,
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
