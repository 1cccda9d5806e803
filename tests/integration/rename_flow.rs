//! Integration tests for renaming.

use protosort::config::Config;
use protosort::pipeline::Pipeline;
use protosort::rename::{RenameOutcome, Renamer};

use crate::common::{Protocol, batch_dir, file_names, page_texts};

#[test]
fn test_generic_batch_renames_every_protocol() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().phase("as-left").unit("RACK-1").serial("100").write(dir, "scan_001.pdf");
    Protocol::generic().unit("RACK-2").serial("200").write(dir, "scan_002.PDF");
    std::fs::write(dir.join("notes.txt"), "keep me").unwrap();

    let report = Pipeline::new().run(&Config::new(dir)).unwrap();

    assert!(!report.merge_required);
    assert_eq!(report.renamed_count(), 2);
    assert_eq!(
        file_names(dir),
        vec!["RACK-1_100_As-left.pdf", "RACK-2_200.pdf", "notes.txt"]
    );
}

#[test]
fn test_collisions_get_numbered_and_keep_content() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().unit("U").serial("S").page("copy one").write(dir, "a.pdf");
    Protocol::generic().unit("U").serial("S").page("copy two").write(dir, "b.pdf");
    Protocol::generic().unit("U").serial("S").page("copy three").write(dir, "c.pdf");

    Renamer::new().post_process(dir, false).unwrap();

    assert_eq!(file_names(dir), vec!["U_S.pdf", "U_S_1.pdf", "U_S_2.pdf"]);
    assert!(page_texts(&dir.join("U_S.pdf"))[1].contains("copy one"));
    assert!(page_texts(&dir.join("U_S_1.pdf"))[1].contains("copy two"));
    assert!(page_texts(&dir.join("U_S_2.pdf"))[1].contains("copy three"));
}

#[test]
fn test_unit_id_is_cut_at_unsafe_character() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().unit("AB<CD>EF").serial("77").write(dir, "a.pdf");

    let outcome = Renamer::new().rename_one(dir, "a.pdf").unwrap();

    assert_eq!(outcome.final_name(), "AB_77.pdf");
}

#[test]
fn test_system_sn_wins_over_serial_number() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic()
        .unit("U")
        .serial("MODULE-SN")
        .system_sn("SYSTEM-SN")
        .write(dir, "a.pdf");

    let outcome = Renamer::new().rename_one(dir, "a.pdf").unwrap();

    assert_eq!(outcome.final_name(), "U_SYSTEM-SN.pdf");
}

#[test]
fn test_only_merged_leaves_sources_alone() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().unit("SRC").serial("1").write(dir, "source1.pdf");
    Protocol::generic().unit("OUT").serial("2").write(dir, "merged_no_flag.pdf");

    let outcomes = Renamer::new().post_process(dir, true).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(file_names(dir), vec!["OUT_2.pdf", "source1.pdf"]);
}

#[test]
fn test_second_run_is_stable() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic().unit("U").serial("S").write(dir, "a.pdf");

    Renamer::new().post_process(dir, false).unwrap();
    let outcomes = Renamer::new().post_process(dir, false).unwrap();

    assert!(matches!(outcomes[0], RenameOutcome::Unchanged { .. }));
    assert_eq!(file_names(dir), vec!["U_S.pdf"]);
}

#[test]
fn test_fields_read_from_single_text_object() {
    let batch = batch_dir();
    let dir = batch.path();
    Protocol::generic()
        .phase("as-left")
        .slot(4)
        .unit("RACK-7")
        .serial("SN-40112")
        .single_text_object()
        .write(dir, "report.pdf");

    let outcome = Renamer::new().rename_one(dir, "report.pdf").unwrap();

    assert_eq!(outcome.final_name(), "RACK-7_SN-40112_As-left.pdf");
}
