//! Partitioning a batch into phase groups.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use crate::io::{PdfReader, TextExtractor, list_pdfs};
use crate::protocol::{Phase, parse_file};

/// One of the four disjoint merge groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Protocols flagged `as-found`.
    AsFound,
    /// Protocols flagged `as-left`.
    AsLeft,
    /// Protocols flagged `found-left`.
    FoundLeft,
    /// Protocols without any phase marker.
    NoFlag,
}

impl Bucket {
    /// All buckets in merge order.
    pub const ALL: [Bucket; 4] = [Self::AsFound, Self::AsLeft, Self::FoundLeft, Self::NoFlag];

    /// Bucket name as used in output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AsFound => "as_found",
            Self::AsLeft => "as_left",
            Self::FoundLeft => "found_left",
            Self::NoFlag => "no_flag",
        }
    }

    /// File name of this bucket's merged output, e.g. `merged_as_found.pdf`.
    pub fn output_file_name(&self) -> String {
        format!("merged_{}.pdf", self.as_str())
    }
}

impl From<Option<Phase>> for Bucket {
    fn from(phase: Option<Phase>) -> Self {
        match phase {
            Some(Phase::AsFound) => Self::AsFound,
            Some(Phase::AsLeft) => Self::AsLeft,
            Some(Phase::FoundLeft) => Self::FoundLeft,
            None => Self::NoFlag,
        }
    }
}

/// A protocol file waiting to be merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntry {
    /// Parsed slot, the ordering key.
    pub slot: i64,
    /// Source PDF.
    pub path: PathBuf,
}

/// Protocol files partitioned by bucket, each list in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseGroups {
    /// `as-found` protocols.
    pub as_found: Vec<GroupEntry>,
    /// `as-left` protocols.
    pub as_left: Vec<GroupEntry>,
    /// `found-left` protocols.
    pub found_left: Vec<GroupEntry>,
    /// Protocols without a marker.
    pub no_flag: Vec<GroupEntry>,
}

impl PhaseGroups {
    /// Entries of one bucket.
    pub fn get(&self, bucket: Bucket) -> &[GroupEntry] {
        match bucket {
            Bucket::AsFound => &self.as_found,
            Bucket::AsLeft => &self.as_left,
            Bucket::FoundLeft => &self.found_left,
            Bucket::NoFlag => &self.no_flag,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<GroupEntry> {
        match bucket {
            Bucket::AsFound => &mut self.as_found,
            Bucket::AsLeft => &mut self.as_left,
            Bucket::FoundLeft => &mut self.found_left,
            Bucket::NoFlag => &mut self.no_flag,
        }
    }

    /// Append an entry to a bucket.
    pub fn push(&mut self, bucket: Bucket, entry: GroupEntry) {
        self.get_mut(bucket).push(entry);
    }

    /// Iterate over buckets in merge order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[GroupEntry])> {
        Bucket::ALL.into_iter().map(move |bucket| (bucket, self.get(bucket)))
    }

    /// Total number of grouped files.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, entries)| entries.len()).sum()
    }

    /// Whether no file was grouped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups a folder's PDFs by phase flag.
#[derive(Debug, Clone, Default)]
pub struct MergeGrouper<E = PdfReader> {
    extractor: E,
}

impl MergeGrouper<PdfReader> {
    /// Create a grouper that reads PDFs with `lopdf`.
    pub fn new() -> Self {
        Self::with_extractor(PdfReader::new())
    }
}

impl<E: TextExtractor> MergeGrouper<E> {
    /// Create a grouper over a custom text source.
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Partition the PDFs in `folder`.
    ///
    /// Unreadable PDFs land in [`Bucket::NoFlag`] with slot 0. An unreadable
    /// folder is logged and yields empty groups.
    pub fn group(&self, folder: &Path) -> PhaseGroups {
        let pdfs = match list_pdfs(folder) {
            Ok(pdfs) => pdfs,
            Err(err) => {
                error!(folder = %folder.display(), error = %err, "cannot scan folder for grouping");
                return PhaseGroups::default();
            }
        };

        let mut groups = PhaseGroups::default();
        for path in pdfs {
            let fields = parse_file(&self.extractor, &path).into_fields();
            let bucket = Bucket::from(fields.phase());
            debug!(path = %path.display(), slot = fields.slot, bucket = bucket.as_str(), "grouped");
            groups.push(
                bucket,
                GroupEntry {
                    slot: fields.slot,
                    path,
                },
            );
        }

        groups
    }
}
