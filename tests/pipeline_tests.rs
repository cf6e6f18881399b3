//! End-to-end tests for the extract pipeline and filename resolution.

use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;

use classfetch::export::filename;
use classfetch::model::stats::FileStatus;
use classfetch::pipeline::extract::run_extract;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn no_progress(_: usize, _: usize, _: &str) {}

// ─── Test 1: two members, one sentinel → exactly 2 data rows ────────

#[test]
fn test_extract_two_valid_one_sentinel() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("rawdata");
    input.create_dir_all().unwrap();
    input
        .child("class_a.json")
        .write_file(&fixture("class_a.json"))
        .unwrap();
    let results = tmp.child("results");

    let run = run_extract(input.path(), results.path(), true, &no_progress).unwrap();

    assert_eq!(run.outcomes.len(), 1);
    assert_eq!(run.outcomes[0].status, FileStatus::Success);
    assert_eq!(run.total_students(), 1, "the sentinel-only member is not counted");
    assert_eq!(run.total_submissions(), 2);

    let csv = results.child("class_a.csv");
    csv.assert(predicate::path::exists());

    let bytes = std::fs::read(csv.path()).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF], "CSV must start with a UTF-8 BOM");

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3, "header + exactly 2 data rows, got: {text}");
    assert!(lines[0].starts_with("학생이름,과제명"));
    assert!(lines[1].starts_with("김철수,"));
    assert!(lines[2].starts_with("김철수,"));
    assert!(text.contains("https://files.example.com/a/1.pdf"));
    // Newline junk after the URL never reaches the CSV.
    assert!(text.contains("https://files.example.com/a/2.hwp"));
    assert!(!text.contains("2.hwp\napplication"));
}

// ─── Test 2: rows sorted by student name ────────────────────────────

#[test]
fn test_extract_rows_sorted_by_student() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("rawdata");
    input.create_dir_all().unwrap();
    input
        .child("class_b.json")
        .write_file(&fixture("class_b.json"))
        .unwrap();
    let results = tmp.child("results");

    run_extract(input.path(), results.path(), false, &no_progress).unwrap();

    let bytes = std::fs::read(results.child("class_b.csv").path()).unwrap();
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();

    // RFC 4180 quoted fields may contain newlines, so merge physical lines
    // into logical records by tracking quote parity before asserting order.
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        if current.matches('"').count() % 2 == 0 {
            lines.push(std::mem::take(&mut current));
        }
    }

    // 강민준 sorts before 최지우 even though the export lists 최지우 first.
    assert!(lines[1].starts_with("강민준,"), "got: {}", lines[1]);
    assert!(lines[2].starts_with("최지우,"), "got: {}", lines[2]);
}

// ─── Test 3: a broken report is skipped, the batch continues ────────

#[test]
fn test_extract_broken_report_does_not_abort_batch() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("rawdata");
    input.create_dir_all().unwrap();
    input
        .child("a_broken.json")
        .write_file(&fixture("broken.json"))
        .unwrap();
    input
        .child("class_a.json")
        .write_file(&fixture("class_a.json"))
        .unwrap();
    let results = tmp.child("results");

    let run = run_extract(input.path(), results.path(), true, &no_progress).unwrap();

    assert_eq!(run.outcomes.len(), 2);
    assert!(matches!(run.outcomes[0].status, FileStatus::Failed(_)));
    assert_eq!(run.outcomes[1].status, FileStatus::Success);
    assert_eq!(run.successful_files(), 1);

    // The failed file appears in the summary with its error status.
    let summary = results.child("summary.csv");
    summary.assert(predicate::str::contains("a_broken.json"));
    summary.assert(predicate::str::contains("=== 전체 요약 ==="));
}

// ─── Test 4: summary CSVs ───────────────────────────────────────────

#[test]
fn test_extract_writes_summary_files() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("rawdata");
    input.create_dir_all().unwrap();
    input
        .child("class_a.json")
        .write_file(&fixture("class_a.json"))
        .unwrap();
    input
        .child("class_b.json")
        .write_file(&fixture("class_b.json"))
        .unwrap();
    let results = tmp.child("results");

    run_extract(input.path(), results.path(), true, &no_progress).unwrap();

    let summary = results.child("summary.csv");
    summary.assert(predicate::str::contains("class_a.json,1명,2건"));
    summary.assert(predicate::str::contains("class_b.json,2명,2건"));

    let detailed = results.child("detailed_summary.csv");
    detailed.assert(predicate::str::contains("class_a.json,김철수,2건"));
    detailed.assert(predicate::str::contains("class_b.json,강민준,1건"));
    detailed.assert(predicate::str::contains("class_b.json,최지우,1건"));
}

// ─── Test 5: no-summary flag skips the aggregate files ──────────────

#[test]
fn test_extract_without_summaries() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let input = tmp.child("rawdata");
    input.create_dir_all().unwrap();
    input
        .child("class_a.json")
        .write_file(&fixture("class_a.json"))
        .unwrap();
    let results = tmp.child("results");

    run_extract(input.path(), results.path(), false, &no_progress).unwrap();

    results.child("class_a.csv").assert(predicate::path::exists());
    results
        .child("summary.csv")
        .assert(predicate::path::missing());
    results
        .child("detailed_summary.csv")
        .assert(predicate::path::missing());
}

// ─── Test 6: filename collision counter ─────────────────────────────

#[test]
fn test_filename_collision_sequence() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let dir = tmp.path();

    let first = filename::resolve(dir, "report.pdf", None, "https://x/report.pdf");
    assert_eq!(first.file_name().unwrap().to_str().unwrap(), "report.pdf");
    std::fs::write(&first, b"1").unwrap();

    let second = filename::resolve(dir, "report.pdf", None, "https://x/report.pdf");
    assert_eq!(
        second.file_name().unwrap().to_str().unwrap(),
        "report_1.pdf"
    );
    std::fs::write(&second, b"2").unwrap();

    let third = filename::resolve(dir, "report.pdf", None, "https://x/report.pdf");
    assert_eq!(
        third.file_name().unwrap().to_str().unwrap(),
        "report_2.pdf",
        "counter values are never reused"
    );
}
