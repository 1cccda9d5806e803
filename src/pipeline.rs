//! One run over a batch folder: classify, optionally merge, then rename.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::classify::{BatchClassifier, Classification};
use crate::config::{Config, MergeMode};
use crate::error::Result;
use crate::io::{PdfReader, TextExtractor};
use crate::merge::{
    Bucket, BucketOutcome, GroupEntry, MergeGrouper, OrderedMerger, PhaseGroups, order_by_slot,
};
use crate::rename::{RenameOutcome, Renamer};

/// A merge the pipeline would perform, reported in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMerge {
    /// Bucket to merge.
    pub bucket: Bucket,
    /// Output that would be written.
    pub output: PathBuf,
    /// Sources in slot order.
    pub sources: Vec<GroupEntry>,
}

/// Everything a run did, or in dry-run mode would do.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Batch folder.
    pub folder: PathBuf,
    /// Whether the folder was left untouched.
    pub dry_run: bool,
    /// Merge policy in effect.
    pub merge_mode: MergeMode,
    /// Classifier result; absent when the policy decided without scanning.
    pub classification: Option<Classification>,
    /// Whether the merge path was taken.
    pub merge_required: bool,
    /// Merges planned in dry-run mode.
    pub planned_merges: Vec<PlannedMerge>,
    /// Per-bucket merge results.
    pub merges: Vec<BucketOutcome>,
    /// Renames performed or planned.
    pub renames: Vec<RenameOutcome>,
}

impl RunReport {
    fn new(config: &Config, classification: Option<Classification>, merge_required: bool) -> Self {
        Self {
            folder: config.folder.clone(),
            dry_run: config.dry_run,
            merge_mode: config.merge_mode,
            classification,
            merge_required,
            planned_merges: Vec::new(),
            merges: Vec::new(),
            renames: Vec::new(),
        }
    }

    /// Number of files that were (or would be) renamed.
    pub fn renamed_count(&self) -> usize {
        self.renames
            .iter()
            .filter(|outcome| matches!(outcome, RenameOutcome::Renamed { .. }))
            .count()
    }

    /// Number of buckets whose merge failed.
    pub fn failed_merges(&self) -> usize {
        self.merges
            .iter()
            .filter(|outcome| matches!(outcome, BucketOutcome::Failed { .. }))
            .count()
    }
}

/// Slot-ordered merges for every non-empty bucket, without loading any PDF.
pub fn plan_merges(groups: &PhaseGroups, folder: &Path) -> Vec<PlannedMerge> {
    groups
        .iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(bucket, entries)| PlannedMerge {
            bucket,
            output: folder.join(bucket.output_file_name()),
            sources: order_by_slot(entries),
        })
        .collect()
}

/// Runs the classify, merge and rename stages over one folder.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<E = PdfReader> {
    classifier: BatchClassifier<E>,
    grouper: MergeGrouper<E>,
    merger: OrderedMerger,
    renamer: Renamer<E>,
}

impl Pipeline<PdfReader> {
    /// Create a pipeline that reads PDFs with `lopdf`.
    pub fn new() -> Self {
        Self::with_extractor(PdfReader::new())
    }
}

impl<E: TextExtractor + Clone> Pipeline<E> {
    /// Create a pipeline whose stages share a custom text source.
    ///
    /// Merging always loads the real documents.
    pub fn with_extractor(extractor: E) -> Self {
        Self {
            classifier: BatchClassifier::with_extractor(extractor.clone()),
            grouper: MergeGrouper::with_extractor(extractor.clone()),
            merger: OrderedMerger::new(),
            renamer: Renamer::with_extractor(extractor),
        }
    }

    /// Process `config.folder`.
    ///
    /// Batches that need merging get one merged PDF per non-empty bucket,
    /// and only the merged outputs are renamed. Other batches have every
    /// PDF renamed. A failed bucket is recorded in the report and does not
    /// stop the run.
    ///
    /// # Errors
    ///
    /// Fails if renaming fails; see [`Renamer::post_process`].
    pub fn run(&self, config: &Config) -> Result<RunReport> {
        let folder = config.folder.as_path();
        info!(folder = %folder.display(), dry_run = config.dry_run, "processing batch");

        let (classification, merge_required) = match config.merge_mode {
            MergeMode::Auto => {
                let classification = self.classifier.classify(folder);
                let required = classification.requires_merge;
                (Some(classification), required)
            }
            MergeMode::Always => (None, true),
            MergeMode::Never => (None, false),
        };

        let mut report = RunReport::new(config, classification, merge_required);

        match (merge_required, config.dry_run) {
            (true, true) => {
                let groups = self.grouper.group(folder);
                report.planned_merges = plan_merges(&groups, folder);
            }
            (true, false) => {
                let groups = self.grouper.group(folder);
                report.merges = self.merger.merge_groups(&groups, folder);
                report.renames = self.renamer.post_process(folder, true)?;
            }
            (false, true) => report.renames = self.renamer.plan(folder, false)?,
            (false, false) => report.renames = self.renamer.post_process(folder, false)?,
        }

        info!(
            renamed = report.renamed_count(),
            merged = report.merges.len() - report.failed_merges(),
            "batch done"
        );
        Ok(report)
    }
}
