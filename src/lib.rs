//! protosort - Merge and rename calibration protocol PDFs.
//!
//! A batch is a flat folder of protocol PDFs produced by one calibration
//! run. protosort reads the first page of each protocol and then:
//!
//! - merges Sirius batches into one PDF per measurement phase, pages in
//!   slot order
//! - renames protocols (or the merged outputs) to
//!   `<unit id>_<serial>[_phase].pdf` without ever overwriting a file
//!
//! # Examples
//!
//! ```no_run
//! use protosort::config::Config;
//! use protosort::pipeline::Pipeline;
//!
//! # fn example() -> protosort::Result<()> {
//! let config = Config::new("/data/batch-42");
//! let report = Pipeline::new().run(&config)?;
//! println!("Renamed {} protocol(s)", report.renamed_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use protosort::classify::BatchClassifier;
//! use protosort::rename::Renamer;
//! use std::path::Path;
//!
//! # fn example() -> protosort::Result<()> {
//! let folder = Path::new("/data/batch-42");
//! if !BatchClassifier::new().requires_merge(folder) {
//!     Renamer::new().post_process(folder, false)?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod protocol;
pub mod rename;


// Re-export commonly used types
pub use config::{Config, MergeMode};
pub use error::{ProtoSortError, Result};
pub use pipeline::{Pipeline, RunReport};
pub use protocol::{Extraction, ParsedFields, Phase};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
