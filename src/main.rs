//! pipecopy command line
//!
//! Usage: pipecopy <source> <destination>

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pipecopy::Config;

/// Copy a file through a pipe to a child process.
#[derive(Parser)]
#[command(name = "pipecopy", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// File to read
    #[arg(value_name = "source", allow_hyphen_values = true)]
    source: PathBuf,

    /// File to create or overwrite
    #[arg(value_name = "destination", allow_hyphen_values = true)]
    destination: PathBuf,
}

fn main() -> Result<()> {
    init_logging();

    // Any argument count other than two is a usage error, reported before
    // anything is opened.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprint!("{}", e);
            process::exit(1);
        }
    };

    // SAFETY: this binary never spawns a thread, and the fmt subscriber
    // writes synchronously on the calling thread.
    let report = unsafe {
        pipecopy::copy_file(&args.source, &args.destination, &Config::default())
    }
    .with_context(|| {
        format!(
            "copying {} to {}",
            args.source.display(),
            args.destination.display()
        )
    })?;

    log::info!("relayed {} bytes through the pipe", report.bytes);
    println!("File copied successfully!");
    Ok(())
}

/// Route `log` records to stderr. `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
