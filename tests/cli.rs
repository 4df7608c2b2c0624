mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{write_pdf, SIMPLE_LINES};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("pdf_readability").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn missing_argument_exits_with_one() {
    cmd().assert().code(1);
}

#[test]
fn help_exits_cleanly() {
    cmd().arg("--help").assert().success().stdout(contains("PDF"));
}

#[test]
fn nonexistent_file() {
    cmd()
        .arg("/no/such/file.pdf")
        .assert()
        .code(1)
        .stdout(contains("Error: File not found at /no/such/file.pdf"));
}

#[test]
fn extraction_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pdf_path = temp_dir.path().join("broken.pdf");
    fs::write(&pdf_path, "not a pdf").unwrap();

    cmd()
        .arg(&pdf_path)
        .assert()
        .code(1)
        .stdout(contains("Error extracting text"));

    assert!(!temp_dir.path().join("broken_extracted.txt").exists());
}

#[test]
fn analyzes_and_saves_text() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pdf_path = temp_dir.path().join("story.pdf");
    write_pdf(&pdf_path, SIMPLE_LINES);

    cmd()
        .arg(&pdf_path)
        .assert()
        .success()
        .stdout(contains("--- Analyzing PDF:"))
        .stdout(contains("Successfully extracted 18 words."))
        .stdout(contains("--- Readability Analysis Results ---"))
        .stdout(contains("Flesch Reading Ease:"))
        .stdout(contains("Automated Readability Index:"))
        .stdout(contains("Estimated Grade Level:"))
        .stdout(contains("Extracted text saved to:"));

    let saved = fs::read_to_string(temp_dir.path().join("story_extracted.txt")).unwrap();
    let expected = pdf_readability::extract_text(&pdf_path).unwrap().text;
    assert_eq!(saved, expected);
}

#[test]
fn blank_pdf_reports_skipped_analysis() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pdf_path = temp_dir.path().join("blank.pdf");
    write_pdf(&pdf_path, &[]);

    cmd()
        .arg(&pdf_path)
        .assert()
        .success()
        .stdout(contains(
            "Error: Could not analyze text. Extraction failed or text is empty.",
        ));
}

#[test]
fn no_save_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pdf_path = temp_dir.path().join("story.pdf");
    write_pdf(&pdf_path, SIMPLE_LINES);

    cmd().arg("--no-save").arg(&pdf_path).assert().success();

    assert!(!temp_dir.path().join("story_extracted.txt").exists());
}

#[test]
fn json_export_into_output_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let pdf_path = temp_dir.path().join("story.pdf");
    write_pdf(&pdf_path, SIMPLE_LINES);
    let reports_dir = temp_dir.path().join("reports");

    cmd()
        .args(["--quiet", "--json", "story.json", "--output-dir"])
        .arg(&reports_dir)
        .arg(&pdf_path)
        .assert()
        .success()
        .stdout("");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(reports_dir.join("story.json")).unwrap()).unwrap();
    assert!(json["analysis"]["flesch_reading_ease"].is_number());
    assert_eq!(json["word_count"], 18);
}

#[test]
fn directory_mode_summarizes() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_pdf(&temp_dir.path().join("one.pdf"), SIMPLE_LINES);
    write_pdf(&temp_dir.path().join("two.pdf"), &["Short text for a second file here."]);
    fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

    cmd()
        .arg("--dir")
        .arg(temp_dir.path())
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(contains("Files analyzed: 2"))
        .stdout(contains("Failed: 0"));

    assert!(temp_dir.path().join("one_extracted.txt").exists());
    assert!(temp_dir.path().join("two_extracted.txt").exists());
}

#[test]
fn huge_max_size_is_accepted() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_pdf(&temp_dir.path().join("one.pdf"), SIMPLE_LINES);

    cmd()
        .arg("--dir")
        .arg(temp_dir.path())
        .args(["--max-size", &u64::MAX.to_string(), "--summary-only"])
        .assert()
        .success()
        .stdout(contains("Files analyzed: 1"));
}

#[test]
fn path_and_dir_conflict() {
    let temp_dir = tempfile::tempdir().unwrap();

    cmd()
        .arg("--dir")
        .arg(temp_dir.path())
        .arg("file.pdf")
        .assert()
        .code(1);
}
