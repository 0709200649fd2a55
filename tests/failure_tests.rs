//! Failure paths: every one must exit with status 1 and leave unrelated files alone

use std::fs;
use std::path::Path;

use pipecopy_test_runner::{markers, run_copy, write_pattern};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_pipecopy");

fn bin() -> &'static Path {
    Path::new(BIN)
}

#[test]
fn test_missing_source_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("does-not-exist");
    let destination = dir.path().join("out");

    let run = run_copy(bin(), &source, &destination).unwrap();

    run.assert_failed();
    run.assert_stderr_marker(markers::SOURCE_OPEN_FAILED);
    assert!(!destination.exists(), "destination was created for a missing source");
}

#[test]
fn test_missing_source_leaves_existing_destination_untouched() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("does-not-exist");
    let destination = dir.path().join("precious");
    let original = write_pattern(&destination, 4096).unwrap();

    let run = run_copy(bin(), &source, &destination).unwrap();

    run.assert_failed();
    assert!(
        fs::read(&destination).unwrap() == original,
        "existing destination was modified"
    );
}

#[test]
fn test_destination_is_a_directory() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("in");
    let bystander = dir.path().join("bystander");
    write_pattern(&source, 100_000).unwrap();
    let untouched = write_pattern(&bystander, 300).unwrap();

    let run = run_copy(bin(), &source, dir.path()).unwrap();

    run.assert_failed();
    run.assert_stderr_marker(markers::DESTINATION_OPEN_FAILED);
    assert!(fs::read(&bystander).unwrap() == untouched);
    assert_eq!(fs::read(&source).unwrap().len(), 100_000, "source was modified");
}

#[test]
fn test_destination_in_missing_directory() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("in");
    let destination = dir.path().join("no-such-dir").join("out");
    write_pattern(&source, 20_000).unwrap();

    let run = run_copy(bin(), &source, &destination).unwrap();

    run.assert_failed();
    assert!(!destination.exists());
}

#[test]
fn test_consumer_failure_fails_the_copy() {
    // An empty source means the producer never writes and finishes all of
    // its own work cleanly; only the consumer's exit status can fail the run.
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("empty");
    fs::write(&source, b"").unwrap();
    let destination = dir.path().join("missing").join("out");

    let run = run_copy(bin(), &source, &destination).unwrap();

    run.assert_failed();
    run.assert_stderr_marker(markers::CONSUMER_FAILED);
}

#[test]
fn test_consumer_failure_with_data_in_flight() {
    // Far more than the pipe can buffer: the producer runs into the closed
    // read end, and the consumer's failure is what gets reported.
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("big");
    write_pattern(&source, 2 * 1024 * 1024).unwrap();

    let run = run_copy(bin(), &source, dir.path()).unwrap();

    run.assert_failed();
    run.assert_stderr_marker(markers::CONSUMER_FAILED);
}
