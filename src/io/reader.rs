//! PDF loading and first-page text extraction.
//!
//! Everything the rest of the crate knows about a protocol comes from the
//! plain text of its first page. [`TextExtractor`] is the seam for that:
//! [`PdfReader`] implements it on top of `lopdf`, tests plug in fakes.
//!
//! # Examples
//!
//! ```no_run
//! use protosort::io::{PdfReader, TextExtractor};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let text = reader.first_page_text(Path::new("protocol.pdf"))?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

use crate::error::{ProtoSortError, Result};

/// Source of first-page text for a PDF path.
pub trait TextExtractor {
    /// Return the plain text of page 1 of the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a PDF, has no
    /// pages, or the page content cannot be decoded.
    fn first_page_text(&self, path: &Path) -> Result<String>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for &T {
    fn first_page_text(&self, path: &Path) -> Result<String> {
        (**self).first_page_text(path)
    }
}

/// A loaded PDF document together with where it came from.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,
}

/// PDF reader backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF document, rejecting files without pages.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoSortError::FailedToLoadPdf`] if the file cannot be
    /// parsed and [`ProtoSortError::NoPages`] if its page tree is empty.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let document = Document::load(path)
            .map_err(|e| ProtoSortError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(ProtoSortError::NoPages {
                path: path.to_path_buf(),
            });
        }

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
        })
    }
}

impl TextExtractor for PdfReader {
    fn first_page_text(&self, path: &Path) -> Result<String> {
        let mut document = self.load(path)?.document;
        let extraction_error =
            |e: lopdf::Error| ProtoSortError::text_extraction(path.to_path_buf(), e.to_string());

        // Page numbers are 1-based; the lowest key is the first page.
        let (first, page_id) = document
            .get_pages()
            .into_iter()
            .next()
            .ok_or_else(|| ProtoSortError::NoPages {
                path: path.to_path_buf(),
            })?;

        let data = document.get_page_content(page_id).map_err(extraction_error)?;
        let content = Content::decode(&data).map_err(extraction_error)?;
        let rewritten = break_text_lines(content).encode().map_err(extraction_error)?;

        // lopdf only ends a line at `ET`, so the page gets a plain content
        // stream with one text object per visual line.
        let stream_id = document.add_object(Stream::new(dictionary! {}, rewritten));
        document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(extraction_error)?
            .set("Contents", stream_id);

        document.extract_text(&[first]).map_err(extraction_error)
    }
}

/// Close and reopen the text object wherever the text cursor moves to a
/// new line after something was shown.
///
/// Line moves are `T*`, `'`, `"`, `Td`/`TD` with a vertical offset and `Tm`
/// with a new baseline. `'` and `"` become plain `Tj` so their strings are
/// extracted too.
fn break_text_lines(content: Content) -> Content {
    let mut operations = Vec::with_capacity(content.operations.len());
    let mut shown = false;
    let mut baseline: Option<f64> = None;

    for operation in content.operations {
        let new_line = match operation.operator.as_str() {
            "T*" | "'" | "\"" => true,
            "Td" | "TD" => operation
                .operands
                .get(1)
                .and_then(number)
                .is_some_and(|ty| ty != 0.0),
            "Tm" => {
                let y = operation.operands.get(5).and_then(number);
                let moved = y.is_none() || y != baseline;
                baseline = y;
                moved
            }
            _ => false,
        };

        if new_line && shown {
            operations.push(Operation::new("ET", vec![]));
            operations.push(Operation::new("BT", vec![]));
            shown = false;
        }

        match operation.operator.as_str() {
            "BT" | "ET" => shown = false,
            "Tj" | "TJ" => shown = true,
            _ => {}
        }

        if matches!(operation.operator.as_str(), "'" | "\"") {
            if let Some(text) = operation.operands.into_iter().last() {
                operations.push(Operation::new("Tj", vec![text]));
                shown = true;
            }
        } else {
            operations.push(operation);
        }
    }

    Content { operations }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}
