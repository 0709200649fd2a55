//! Consumer process: pipe to destination file
//!
//! Runs in the forked child. It owns the read end of the channel, persists
//! everything it drains into the destination, and reports through its exit
//! status: 0 on success, 1 on any failure.

use std::fs::OpenOptions;
use std::path::Path;

use crate::config::Config;
use crate::error::{End, Error, Result, Role};
use crate::pipe::Channel;
use crate::process;
use crate::transfer::{self, TransferBuffer};

/// Drain `channel` into `destination`, returning the number of bytes written.
///
/// The write end is closed before anything else; while this process keeps
/// a copy of it, the pipe can never reach end-of-stream.
pub fn run(channel: Channel, destination: &Path, config: &Config) -> Result<u64> {
    let Channel { mut read, write } = channel;
    write.close().map_err(|source| Error::EndpointClose {
        role: Role::Consumer,
        end: End::Write,
        source,
    })?;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(destination)
        .map_err(|source| Error::DestinationOpen {
            path: destination.to_path_buf(),
            source,
        })?;

    let mut buffer = TransferBuffer::new(config.buffer_size());
    let copied = transfer::drain(&mut read, &mut file, &mut buffer)?;

    if let Err(e) = read.close() {
        log::warn!("consumer: closing pipe read end failed: {}", e);
    }
    drop(file);
    Ok(copied)
}

/// Turn the consumer's result into its exit status and terminate the child.
pub fn exit_with(result: Result<u64>) -> ! {
    match result {
        Ok(bytes) => {
            log::debug!(
                "consumer {}: wrote {} bytes",
                std::process::id(),
                bytes
            );
            process::exit_child(0)
        }
        Err(e) => {
            log::error!("{}", e.chain());
            process::exit_child(1)
        }
    }
}
