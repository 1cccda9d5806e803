//! Batch classification: does this folder hold a Sirius system?
//!
//! Only Sirius batches are merged. A batch counts as Sirius as soon as one
//! PDF mentions the family name on its first page.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::io::{PdfReader, TextExtractor, list_pdfs};

/// Marker that identifies the merged product family (compared case-insensitively).
pub const SIRIUS_MARKER: &str = "sirius";

/// Result of scanning a folder for the family marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Whether the batch needs merging.
    pub requires_merge: bool,
    /// File whose first page carried the marker.
    pub matched: Option<PathBuf>,
    /// PDFs examined before the scan stopped.
    pub files_scanned: usize,
    /// PDFs that could not be read (counted as non-matching).
    pub files_failed: usize,
}

/// Scans a folder's PDFs for the Sirius marker.
#[derive(Debug, Clone, Default)]
pub struct BatchClassifier<E = PdfReader> {
    extractor: E,
}

impl BatchClassifier<PdfReader> {
    /// Create a classifier that reads PDFs with `lopdf`.
    pub fn new() -> Self {
        Self::with_extractor(PdfReader::new())
    }
}

impl<E: TextExtractor> BatchClassifier<E> {
    /// Create a classifier over a custom text source.
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Whether the batch in `folder` requires merging.
    pub fn requires_merge(&self, folder: &Path) -> bool {
        self.classify(folder).requires_merge
    }

    /// Scan `folder`, stopping at the first PDF that mentions the marker.
    ///
    /// Unreadable files are logged and skipped. An unreadable folder is
    /// logged and classified as not requiring a merge.
    pub fn classify(&self, folder: &Path) -> Classification {
        let pdfs = match list_pdfs(folder) {
            Ok(pdfs) => pdfs,
            Err(err) => {
                error!(folder = %folder.display(), error = %err, "cannot scan folder for classification");
                return Classification::default();
            }
        };

        let mut classification = Classification::default();

        for path in pdfs {
            classification.files_scanned += 1;

            let text = match self.extractor.first_page_text(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable PDF during classification");
                    classification.files_failed += 1;
                    continue;
                }
            };

            if text.to_lowercase().contains(SIRIUS_MARKER) {
                debug!(path = %path.display(), "Sirius marker found");
                classification.requires_merge = true;
                classification.matched = Some(path);
                break;
            }
        }

        classification
    }
}
