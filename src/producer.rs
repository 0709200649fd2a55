//! Producer: source file to pipe
//!
//! Runs in the original process after the consumer has been forked.

use std::fs::File;
use std::path::Path;

use crate::config::Config;
use crate::error::{End, Error, Result, Role};
use crate::pipe::Channel;
use crate::transfer::{self, TransferBuffer};

/// Open the source file read-only.
pub fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::SourceOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Stream `source` into `channel` and close the write end.
///
/// Both ends and the source are released on every return path, so the
/// consumer always sees end-of-stream once this returns.
pub fn run(channel: Channel, mut source: File, config: &Config) -> Result<u64> {
    let Channel { read, mut write } = channel;
    read.close().map_err(|source| Error::EndpointClose {
        role: Role::Producer,
        end: End::Read,
        source,
    })?;

    let mut buffer = TransferBuffer::new(config.buffer_size());
    let fed = transfer::feed(&mut source, &mut write, &mut buffer)?;
    drop(source);

    // Closing the last write end is what delivers end-of-stream.
    if let Err(e) = write.close() {
        log::warn!("producer: closing pipe write end failed: {}", e);
    }
    Ok(fed)
}
