//! Integration tests for the merge path of a run.

use protosort::config::{Config, MergeMode};
use protosort::merge::{Bucket, BucketOutcome};
use protosort::pipeline::Pipeline;

use crate::common::{Protocol, batch_dir, file_names, page_texts};

#[test]
fn test_sirius_batch_merges_by_phase_in_slot_order() {
    let batch = batch_dir();
    let dir = batch.path();
    for (name, slot) in [("a.pdf", 3), ("b.pdf", 1), ("c.pdf", 2)] {
        Protocol::sirius()
            .phase("As-left")
            .slot(slot)
            .unit(&format!("U-{slot}"))
            .serial(&format!("SN-{slot}"))
            .write(dir, name);
    }
    Protocol::sirius()
        .phase("As-found")
        .slot(5)
        .unit("U-9")
        .serial("SN-9")
        .write(dir, "d.pdf");

    let report = Pipeline::new().run(&Config::new(dir)).unwrap();

    assert!(report.merge_required);
    assert_eq!(report.merges.len(), 2);
    assert_eq!(report.failed_merges(), 0);
    assert_eq!(
        file_names(dir),
        vec![
            "U-1_SN-1_As-left.pdf",
            "U-9_SN-9_As-found.pdf",
            "a.pdf",
            "b.pdf",
            "c.pdf",
            "d.pdf",
        ]
    );

    let texts = page_texts(&dir.join("U-1_SN-1_As-left.pdf"));
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("U-1"));
    assert!(texts[1].contains("U-2"));
    assert!(texts[2].contains("U-3"));
}

#[test]
fn test_no_output_for_empty_buckets() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::sirius().phase("as-found").unit("U").serial("S").write(dir, "a.pdf");

    let report = Pipeline::new().run(&Config::new(dir)).unwrap();

    assert_eq!(report.merges.len(), 1);
    assert!(matches!(
        report.merges[0],
        BucketOutcome::Merged {
            bucket: Bucket::AsFound,
            ..
        }
    ));
    let names = file_names(dir);
    assert!(!names.iter().any(|n| n.contains("merged_")));
    assert!(!names.iter().any(|n| n.contains("Found-left")));
}

#[test]
fn test_multipage_sources_stay_contiguous() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::sirius()
        .phase("as-left")
        .slot(2)
        .unit("second")
        .page("second page two")
        .write(dir, "a.pdf");
    Protocol::sirius()
        .phase("as-left")
        .slot(1)
        .unit("first")
        .page("first page two")
        .write(dir, "b.pdf");

    Pipeline::new().run(&Config::new(dir)).unwrap();

    let texts = page_texts(&dir.join("first__As-left.pdf"));
    assert_eq!(texts.len(), 4);
    assert!(texts[0].contains("first"));
    assert!(texts[1].contains("first page two"));
    assert!(texts[2].contains("second"));
    assert!(texts[3].contains("second page two"));
}

#[test]
fn test_multi_flag_protocol_is_filed_as_found() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::sirius()
        .phase("found-left as-left as-found")
        .unit("U")
        .serial("S")
        .write(dir, "a.pdf");

    Pipeline::new().run(&Config::new(dir)).unwrap();

    assert!(dir.join("U_S_As-found.pdf").exists());
}

#[test]
fn test_always_mode_merges_generic_batch() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().slot(2).unit("G").serial("2").write(dir, "a.pdf");
    Protocol::generic().slot(1).unit("G").serial("1").write(dir, "b.pdf");
    let mut config = Config::new(dir);
    config.merge_mode = MergeMode::Always;

    let report = Pipeline::new().run(&config).unwrap();

    assert!(report.classification.is_none());
    let texts = page_texts(&dir.join("G_1.pdf"));
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("G"));
    assert!(dir.join("a.pdf").exists());
    assert!(dir.join("b.pdf").exists());
}

#[test]
fn test_single_text_object_protocols_merge_in_slot_order() {
    let batch = batch_dir();
    let dir = batch.path();
    for (name, slot) in [("a.pdf", 2), ("b.pdf", 1)] {
        Protocol::sirius()
            .phase("as-found")
            .slot(slot)
            .unit(&format!("U-{slot}"))
            .serial(&format!("SN-{slot}"))
            .single_text_object()
            .write(dir, name);
    }

    let report = Pipeline::new().run(&Config::new(dir)).unwrap();

    assert_eq!(report.failed_merges(), 0);
    assert!(dir.join("U-1_SN-1_As-found.pdf").exists());
    assert!(!dir.join("merged_no_flag.pdf").exists());
}
