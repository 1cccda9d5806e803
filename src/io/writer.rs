//! PDF writing with atomic replace.
//!
//! The document is serialised to a sibling `.tmp` file and renamed over the
//! target, so a crash never leaves a half-written `merged_*.pdf` behind
//! under its final name.

use lopdf::Document;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ProtoSortError, Result};

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Size of the written file in bytes.
    pub file_size: u64,
}

/// PDF writer: compresses, renumbers and replaces the target atomically.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Save a PDF document to `path`, replacing any existing file.
    ///
    /// The `.tmp` sibling is removed again if any step fails.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoSortError::FailedToCreateOutput`] if the file cannot be
    /// created and [`ProtoSortError::FailedToWrite`] if serialisation, flush
    /// or the final rename fails.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        doc.compress();
        doc.renumber_objects();

        let write_path = path.with_extension("tmp");
        let file = File::create(&write_path).map_err(|e| ProtoSortError::FailedToCreateOutput {
            path: write_path.clone(),
            source: e,
        })?;

        if let Err(err) = write_and_replace(doc, file, &write_path, path) {
            let _ = fs::remove_file(&write_path);
            return Err(err);
        }

        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics { file_size })
    }
}

fn write_and_replace(
    doc: &mut Document,
    file: File,
    write_path: &Path,
    path: &Path,
) -> Result<()> {
    let mut writer = BufWriter::new(file);

    doc.save_to(&mut writer)
        .map_err(|e| ProtoSortError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: std::io::Error::other(e.to_string()),
        })?;

    writer.flush().map_err(|e| ProtoSortError::FailedToWrite {
        path: write_path.to_path_buf(),
        source: e,
    })?;
    drop(writer);

    fs::rename(write_path, path).map_err(|e| ProtoSortError::FailedToWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
