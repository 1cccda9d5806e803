//! Input and output for protocol PDFs.
//!
//! - [`reader`]: loading and first-page text extraction
//! - [`writer`]: atomic PDF output
//! - [`folder`]: flat, name-sorted folder listing

pub mod folder;
pub mod reader;
pub mod writer;

pub use folder::{file_name, is_pdf_name, list_files, list_pdfs};
pub use reader::{LoadedPdf, PdfReader, TextExtractor};
pub use writer::{PdfWriter, WriteStatistics};
