//! Grouping and merging of Sirius protocol batches.
//!
//! A batch is split into four phase buckets by [`MergeGrouper`], then each
//! non-empty bucket is concatenated in slot order by [`OrderedMerger`] into
//! `merged_<bucket>.pdf` next to the sources.
//!
//! # Examples
//!
//! ```no_run
//! use protosort::merge::{MergeGrouper, OrderedMerger};
//! use std::path::Path;
//!
//! let folder = Path::new("/data/batch-42");
//! let groups = MergeGrouper::new().group(folder);
//! for outcome in OrderedMerger::new().merge_groups(&groups, folder) {
//!     println!("{outcome:?}");
//! }
//! ```

pub mod grouper;
pub mod merger;

pub use grouper::{Bucket, GroupEntry, MergeGrouper, PhaseGroups};
pub use merger::{BucketOutcome, MergeSummary, OrderedMerger, order_by_slot};
