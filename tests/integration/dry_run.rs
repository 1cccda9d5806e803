//! Integration tests for dry-run functionality.

use protosort::config::Config;
use protosort::merge::Bucket;
use protosort::pipeline::Pipeline;

use crate::common::{Protocol, batch_dir, file_names};

fn dry_run(dir: &std::path::Path) -> Config {
    let mut config = Config::new(dir);
    config.dry_run = true;
    config
}

#[test]
fn test_dry_run_merge_path_writes_nothing() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::sirius().phase("as-left").slot(2).write(dir, "a.pdf");
    Protocol::sirius().phase("as-left").slot(1).write(dir, "b.pdf");
    let before = file_names(dir);

    let report = Pipeline::new().run(&dry_run(dir)).unwrap();

    assert_eq!(file_names(dir), before);
    assert!(report.merges.is_empty());
    assert_eq!(report.planned_merges.len(), 1);

    let plan = &report.planned_merges[0];
    assert_eq!(plan.bucket, Bucket::AsLeft);
    assert_eq!(plan.output, dir.join("merged_as_left.pdf"));
    assert_eq!(plan.sources[0].path, dir.join("b.pdf"));
    assert_eq!(plan.sources[1].path, dir.join("a.pdf"));
}

#[test]
fn test_dry_run_rename_path_predicts_collisions() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().unit("U").serial("S").write(dir, "a.pdf");
    Protocol::generic().unit("U").serial("S").write(dir, "b.pdf");
    let before = file_names(dir);

    let planned = Pipeline::new().run(&dry_run(dir)).unwrap();

    assert_eq!(file_names(dir), before);
    let names: Vec<&str> = planned.renames.iter().map(|r| r.final_name()).collect();
    assert_eq!(names, vec!["U_S.pdf", "U_S_1.pdf"]);

    let executed = Pipeline::new().run(&Config::new(dir)).unwrap();
    assert_eq!(executed.renames, planned.renames);
}

#[test]
fn test_dry_run_report_serializes() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::sirius().phase("as-found").slot(4).write(dir, "a.pdf");

    let report = Pipeline::new().run(&dry_run(dir)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["dryRun"], true);
    assert_eq!(json["mergeRequired"], true);
    assert_eq!(json["mergeMode"], "auto");
    assert_eq!(json["plannedMerges"][0]["bucket"], "as_found");
    assert_eq!(json["plannedMerges"][0]["sources"][0]["slot"], 4);
}
