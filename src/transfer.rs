//! Buffered transfer loops
//!
//! The consumer drains the pipe into the destination with [`drain`]; the
//! producer feeds the source into the pipe with [`feed`]. Both stage data in
//! a [`TransferBuffer`] and treat every short write as fatal.

use std::io::{self, Read, Write};

use crate::error::{Error, Result, Sink};

/// Fixed-size staging buffer, private to one process.
pub struct TransferBuffer {
    buf: Box<[u8]>,
}

impl TransferBuffer {
    pub fn new(capacity: usize) -> Self {
        TransferBuffer {
            buf: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

/// Copy everything readable from `pipe` into `dest` until end-of-stream.
///
/// Returns the number of bytes persisted.
pub fn drain<R: Read, W: Write>(
    pipe: &mut R,
    dest: &mut W,
    buffer: &mut TransferBuffer,
) -> Result<u64> {
    let mut total: u64 = 0;
    loop {
        let n = match pipe.read(&mut buffer.buf) {
            // All writers closed and the pipe is empty.
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::PipeRead(e)),
        };
        write_chunk(dest, &buffer.buf[..n], Sink::Destination)?;
        total += n as u64;
    }
    dest.flush().map_err(Error::DestinationWrite)?;
    Ok(total)
}

/// Copy `source` into `pipe` chunk by chunk.
///
/// A chunk shorter than the buffer capacity is the last one. Returns the
/// number of bytes written to the pipe.
pub fn feed<R: Read, W: Write>(
    source: &mut R,
    pipe: &mut W,
    buffer: &mut TransferBuffer,
) -> Result<u64> {
    let capacity = buffer.capacity();
    let mut total: u64 = 0;
    loop {
        let n = fill(source, &mut buffer.buf).map_err(Error::SourceRead)?;
        if n == 0 {
            break;
        }
        write_chunk(pipe, &buffer.buf[..n], Sink::Pipe)?;
        total += n as u64;
        if n < capacity {
            break;
        }
    }
    Ok(total)
}

/// Read into `buf` until it is full or the reader reaches end-of-file.
///
/// A count below `buf.len()` therefore always means end-of-file.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Hand `chunk` to one write call and require that all of it was taken.
fn write_chunk<W: Write>(writer: &mut W, chunk: &[u8], sink: Sink) -> Result<()> {
    loop {
        match writer.write(chunk) {
            Ok(n) if n == chunk.len() => return Ok(()),
            Ok(written) => {
                return Err(Error::ShortWrite {
                    sink,
                    written,
                    expected: chunk.len(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::write_failed(sink, e)),
        }
    }
}
