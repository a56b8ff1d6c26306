use std::fs;

use harvest_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("report_pdf");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_a_file_standing_in_for_the_dir() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("status.json", b"{\"runs\":1}").unwrap();
    assert_eq!(first.file_name().unwrap(), "status.json");
    assert_eq!(fs::read(&first).unwrap(), b"{\"runs\":1}");

    let second = writer.write("status.json", b"{\"runs\":2}").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"{\"runs\":2}");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("report.csv", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("report.csv").exists());
}
