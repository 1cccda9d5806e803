//! User-facing output for protosort.
//!
//! Diagnostics go through `tracing`; this module prints what the operator
//! reads: what was merged, what was renamed, and what went wrong.
//!
//! # Examples
//!
//! ```no_run
//! use protosort::config::Config;
//! use protosort::output::{OutputFormatter, display_report};
//! use protosort::pipeline::Pipeline;
//!
//! # fn example(config: Config) -> protosort::Result<()> {
//! let formatter = OutputFormatter::from_config(&config);
//! let report = Pipeline::new().run(&config)?;
//! display_report(&formatter, &report);
//! # Ok(())
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use std::path::Path;

use crate::config::MergeMode;
use crate::io::file_name;
use crate::merge::BucketOutcome;
use crate::pipeline::RunReport;
use crate::rename::RenameOutcome;

fn display_name(path: &Path) -> String {
    file_name(path).map_or_else(|| path.display().to_string(), str::to_string)
}

/// Describe how the merge decision was reached.
pub fn merge_decision_message(report: &RunReport) -> String {
    match (&report.classification, report.merge_mode) {
        (_, MergeMode::Always) => "Merging forced by --merge always".to_string(),
        (_, MergeMode::Never) => "Merging disabled by --merge never".to_string(),
        (Some(classification), MergeMode::Auto) => match &classification.matched {
            Some(matched) => format!("Sirius batch detected in {}", display_name(matched)),
            None => "No Sirius protocol found, renaming only".to_string(),
        },
        (None, MergeMode::Auto) => "No Sirius protocol found, renaming only".to_string(),
    }
}

/// Display a run report.
pub fn display_report(formatter: &OutputFormatter, report: &RunReport) {
    if report.dry_run {
        formatter.info("DRY RUN MODE - no files will be changed");
        formatter.blank_line();
    }

    formatter.info(&format!("Batch: {}", report.folder.display()));
    formatter.info(&merge_decision_message(report));

    if let Some(classification) = &report.classification {
        formatter.detail("Scanned", &classification.files_scanned.to_string());
        if classification.files_failed > 0 {
            formatter.warning(&format!(
                "{} file(s) could not be read during classification",
                classification.files_failed
            ));
        }
    }

    display_planned_merges(formatter, report);
    display_merges(formatter, report);
    display_renames(formatter, report);
    display_summary(formatter, report);
}

fn display_planned_merges(formatter: &OutputFormatter, report: &RunReport) {
    if report.planned_merges.is_empty() {
        return;
    }

    formatter.section("Planned merges:");
    for plan in &report.planned_merges {
        formatter.info(&format!(
            "{} from {} file(s)",
            display_name(&plan.output),
            plan.sources.len()
        ));
        for (idx, source) in plan.sources.iter().enumerate() {
            formatter.list_item(
                idx + 1,
                &format!("slot {}: {}", source.slot, display_name(&source.path)),
            );
        }
    }
}

fn display_merges(formatter: &OutputFormatter, report: &RunReport) {
    if report.merges.is_empty() {
        return;
    }

    formatter.section("Merges:");
    for outcome in &report.merges {
        match outcome {
            BucketOutcome::Merged { summary, .. } => {
                formatter.success(&format!(
                    "Created {} ({} file(s), {} pages, {} KiB)",
                    display_name(&summary.output),
                    summary.sources.len(),
                    summary.total_pages,
                    summary.file_size.div_ceil(1024)
                ));
                for source in &summary.sources {
                    formatter.detail(&format!("slot {}", source.slot), &display_name(&source.path));
                }
            }
            BucketOutcome::Failed { bucket, reason } => {
                formatter.error(&format!("Failed to merge {}: {reason}", bucket.as_str()));
            }
        }
    }
}

fn display_renames(formatter: &OutputFormatter, report: &RunReport) {
    if report.renames.is_empty() {
        return;
    }

    formatter.section(if report.dry_run {
        "Planned renames:"
    } else {
        "Renames:"
    });

    let mut index = 0;
    for outcome in &report.renames {
        match outcome {
            RenameOutcome::Renamed { from, to } => {
                index += 1;
                formatter.list_item(
                    index,
                    &format!("{} -> {}", display_name(from), display_name(to)),
                );
            }
            RenameOutcome::Unchanged { path } => {
                formatter.debug(&format!("{} already has its canonical name", display_name(path)));
            }
            RenameOutcome::Skipped { path, reason } => {
                formatter.warning(&format!("Skipped {}: {reason}", display_name(path)));
            }
        }
    }
}

fn display_summary(formatter: &OutputFormatter, report: &RunReport) {
    formatter.blank_line();

    if report.dry_run {
        formatter.success(&format!(
            "Dry run completed: {} merge(s), {} rename(s) planned",
            report.planned_merges.len(),
            report.renamed_count()
        ));
        formatter.info("  Run without --dry-run to apply them");
        return;
    }

    let failed = report.failed_merges();
    if failed > 0 {
        formatter.warning(&format!("{failed} bucket(s) could not be merged"));
    }

    formatter.success(&format!(
        "Done: {} merged file(s), {} rename(s)",
        report.merges.len() - failed,
        report.renamed_count()
    ));
}
