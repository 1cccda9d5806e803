//! Slot-ordered page concatenation.
//!
//! Each source document's page tree is grafted whole under a fresh root
//! `Pages` node. Grafting keeps inherited page attributes (resources,
//! media boxes) intact and preserves the page order inside every source.

use lopdf::{Document, Object, ObjectId, dictionary};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{ProtoSortError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::merge::grouper::{Bucket, GroupEntry, PhaseGroups};

/// Summary of one written merge output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    /// Written PDF.
    pub output: PathBuf,
    /// Sources in the order their pages were appended.
    pub sources: Vec<GroupEntry>,
    /// Pages in the output.
    pub total_pages: usize,
    /// Size of the written file in bytes.
    pub file_size: u64,
}

/// Per-bucket outcome of [`OrderedMerger::merge_groups`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum BucketOutcome {
    /// Output written.
    Merged {
        /// Bucket merged.
        bucket: Bucket,
        /// What was written.
        summary: MergeSummary,
    },
    /// Merge failed; nothing written for this bucket.
    Failed {
        /// Bucket attempted.
        bucket: Bucket,
        /// Error message.
        reason: String,
    },
}

/// Sort entries by slot, keeping enumeration order among equal slots.
pub fn order_by_slot(entries: &[GroupEntry]) -> Vec<GroupEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by_key(|entry| entry.slot);
    ordered
}

/// Concatenates protocol PDFs in slot order.
#[derive(Debug, Clone, Default)]
pub struct OrderedMerger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl OrderedMerger {
    /// Create a merger with default reader and writer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `entries` into `output`.
    ///
    /// Returns `Ok(None)` without touching disk when `entries` is empty.
    ///
    /// # Errors
    ///
    /// Fails if any source cannot be loaded, the page tree cannot be built,
    /// or the output cannot be written. No output is left under `output` on
    /// failure.
    pub fn merge(&self, entries: &[GroupEntry], output: &Path) -> Result<Option<MergeSummary>> {
        if entries.is_empty() {
            return Ok(None);
        }

        let ordered = order_by_slot(entries);
        let loaded = ordered
            .iter()
            .map(|entry| self.reader.load(&entry.path))
            .collect::<Result<Vec<_>>>()?;

        let mut document = concatenate(loaded)?;
        let total_pages = document.get_pages().len();

        let stats = self.writer.save(&mut document, output)?;
        info!(
            output = %output.display(),
            files = ordered.len(),
            pages = total_pages,
            bytes = stats.file_size,
            "merged"
        );

        Ok(Some(MergeSummary {
            output: output.to_path_buf(),
            sources: ordered,
            total_pages,
            file_size: stats.file_size,
        }))
    }

    /// Merge every non-empty bucket into `folder/merged_<bucket>.pdf`.
    ///
    /// A failing bucket is logged and reported; the remaining buckets are
    /// still merged.
    pub fn merge_groups(&self, groups: &PhaseGroups, folder: &Path) -> Vec<BucketOutcome> {
        let mut outcomes = Vec::new();

        for (bucket, entries) in groups.iter() {
            let output = folder.join(bucket.output_file_name());
            match self.merge(entries, &output) {
                Ok(Some(summary)) => outcomes.push(BucketOutcome::Merged { bucket, summary }),
                Ok(None) => debug!(bucket = bucket.as_str(), "empty bucket, nothing to merge"),
                Err(err) => {
                    error!(bucket = bucket.as_str(), error = %err, "bucket merge failed");
                    outcomes.push(BucketOutcome::Failed {
                        bucket,
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcomes
    }
}

/// Build one document containing all pages of `sources`, in order.
fn concatenate(sources: Vec<LoadedPdf>) -> Result<Document> {
    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let catalog_id = merged.new_object_id();
    let mut max_id = merged.max_id;

    let mut kids = Vec::with_capacity(sources.len());
    let mut total_pages: i64 = 0;

    for source in sources {
        let page_count = source.page_count as i64;
        let mut doc = source.document;

        // Renumber objects to avoid ID conflicts
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let root_pages = source_pages_root(&doc, &source.path)?;
        merged.objects.extend(doc.objects);
        graft(&mut merged, root_pages, pages_id)?;

        kids.push(Object::Reference(root_pages));
        total_pages += page_count;
    }

    merged.max_id = max_id;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total_pages,
        }),
    );
    merged.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }),
    );
    merged.trailer.set("Root", catalog_id);

    // Drop the source catalogs and anything only they referenced.
    merged.prune_objects();

    Ok(merged)
}

fn source_pages_root(doc: &Document, path: &Path) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| {
            ProtoSortError::merge_failed(format!(
                "Failed to get pages reference of {}: {e}",
                path.display()
            ))
        })
}

fn graft(merged: &mut Document, node: ObjectId, parent: ObjectId) -> Result<()> {
    let dict = merged
        .get_object_mut(node)
        .and_then(Object::as_dict_mut)
        .map_err(|e| ProtoSortError::merge_failed(format!("Failed to get pages object: {e}")))?;

    dict.set("Parent", Object::Reference(parent));
    Ok(())
}
