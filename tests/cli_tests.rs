//! Argument validation

use std::fs;
use std::path::Path;

use pipecopy_test_runner::{markers, run_copy, run_pipecopy};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_pipecopy");

fn bin() -> &'static Path {
    Path::new(BIN)
}

fn entries(dir: &TempDir) -> usize {
    fs::read_dir(dir.path()).unwrap().count()
}

#[test]
fn test_wrong_argument_counts_are_usage_errors() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    let d = dir.path().join("d");

    let cases: Vec<Vec<&Path>> = vec![
        vec![],
        vec![&a],
        vec![&a, &b, &c],
        vec![&a, &b, &c, &d],
    ];

    for args in cases {
        println!("Running with {} argument(s)", args.len());
        let run = run_pipecopy(bin(), &args).unwrap();

        run.assert_failed();
        run.assert_stderr_marker(markers::USAGE);
        assert_eq!(entries(&dir), 0, "usage error touched the filesystem");
    }
}

#[test]
fn test_usage_error_names_both_paths() {
    let run = run_pipecopy(bin(), Vec::<&str>::new()).unwrap();

    let stderr = run.stderr_str();
    assert!(stderr.contains("<source>"), "usage missing <source>:\n{}", stderr);
    assert!(
        stderr.contains("<destination>"),
        "usage missing <destination>:\n{}",
        stderr
    );
}

#[test]
fn test_success_message_only_on_stdout() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("in");
    let destination = dir.path().join("out");
    fs::write(&source, b"hello through a pipe").unwrap();

    let run = run_copy(bin(), &source, &destination).unwrap();

    run.assert_succeeded();
    assert!(!run.stderr_str().contains(markers::COPY_OK));
}

#[test]
fn test_paths_may_start_with_a_dash() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("-in"), b"dash").unwrap();

    let output = std::process::Command::new(bin())
        .current_dir(dir.path())
        .args(["-in", "-out"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read(dir.path().join("-out")).unwrap(), b"dash");
}
