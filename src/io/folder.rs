//! Flat folder scanning.
//!
//! Batches are a single directory; subdirectories are never entered.
//! Entries come back sorted by file name so every stage of a run sees the
//! same enumeration order regardless of the platform's readdir order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ProtoSortError, Result};

/// Check whether a file name has a `.pdf` extension, ignoring case.
pub fn is_pdf_name(name: &str) -> bool {
    name.len() >= 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf"))
}

/// List the regular files directly inside `folder`, sorted by name.
///
/// # Errors
///
/// Returns [`ProtoSortError::FolderUnreadable`] if the folder itself or
/// one of its entries cannot be read.
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ProtoSortError::FolderUnreadable {
            path: folder.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// List the PDF files directly inside `folder`, sorted by name.
///
/// # Errors
///
/// Same as [`list_files`].
pub fn list_pdfs(folder: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_files(folder)?
        .into_iter()
        .filter(|path| file_name(path).is_some_and(is_pdf_name))
        .collect())
}

/// Return the final path component as UTF-8, if it is valid UTF-8.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
