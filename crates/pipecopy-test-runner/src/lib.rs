//! pipecopy test runner
//!
//! This crate provides utilities for running the pipecopy binary from
//! host-side integration tests. It spawns the binary, captures its output,
//! and offers assertions over exit status and messages.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context, Result};

/// Constants for messages the binary is expected to print
pub mod markers {
    pub const COPY_OK: &str = "File copied successfully!";
    pub const USAGE: &str = "Usage:";
    pub const SOURCE_OPEN_FAILED: &str = "invalid source file";
    pub const DESTINATION_OPEN_FAILED: &str = "invalid destination file";
    pub const CONSUMER_FAILED: &str = "consumer process exited with status 1";
}

/// Result of one pipecopy invocation, containing output and helper methods
pub struct CopyRun {
    pub output: Output,
}

impl CopyRun {
    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Exit code, or `None` if the process was killed by a signal
    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Assert a clean run: exit code 0 and the success line on stdout
    pub fn assert_succeeded(&self) {
        assert_eq!(
            self.code(),
            Some(0),
            "pipecopy failed unexpectedly\nSTDOUT:\n{}\nSTDERR:\n{}",
            self.stdout_str(),
            self.stderr_str()
        );
        self.assert_marker(markers::COPY_OK);
    }

    /// Assert a failed run: exit code 1, nothing claimed on stdout, a reason on stderr
    pub fn assert_failed(&self) {
        assert_eq!(
            self.code(),
            Some(1),
            "expected exit code 1\nSTDOUT:\n{}\nSTDERR:\n{}",
            self.stdout_str(),
            self.stderr_str()
        );
        assert!(
            !self.stdout_str().contains(markers::COPY_OK),
            "failed run still reported success:\n{}",
            self.stdout_str()
        );
        assert!(
            !self.stderr_str().trim().is_empty(),
            "failed run left no message on stderr"
        );
    }

    /// Assert that a marker appears on stdout
    pub fn assert_marker(&self, marker: &str) {
        let stdout = self.stdout_str();
        assert!(
            stdout.contains(marker),
            "marker '{}' not found in stdout:\n{}",
            marker,
            stdout
        );
    }

    /// Assert that a marker appears on stderr
    pub fn assert_stderr_marker(&self, marker: &str) {
        let stderr = self.stderr_str();
        assert!(
            stderr.contains(marker),
            "marker '{}' not found in stderr:\n{}",
            marker,
            stderr
        );
    }
}

/// Run the pipecopy binary with arbitrary arguments
///
/// `RUST_LOG` is cleared so every run sees the default log level.
pub fn run_pipecopy<I, S>(binary: &Path, args: I) -> Result<CopyRun>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(binary)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .with_context(|| format!("Failed to spawn {}", binary.display()))?;

    Ok(CopyRun { output })
}

/// Convenience function for the usual two-argument invocation
pub fn run_copy(binary: &Path, source: &Path, destination: &Path) -> Result<CopyRun> {
    run_pipecopy(binary, [source.as_os_str(), destination.as_os_str()])
}

/// Deterministic, non-text test content of the given length
pub fn pattern(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Write `pattern(len)` to `path` and return the bytes written
pub fn write_pattern(path: &Path, len: usize) -> Result<Vec<u8>> {
    let data = pattern(len);
    fs::write(path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(data)
}
