//! Pipe channel
//!
//! A pipe is a unidirectional byte stream backed by a bounded kernel buffer.
//! Bytes written to the write end come out of the read end in the same order,
//! with no message boundaries. A reader sees end-of-stream once every copy of
//! the write end, in every process, has been closed.
//!
//! Each end owns its descriptor. `close` consumes the end and reports the
//! result of `close(2)`; dropping an end closes it silently.

use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

/// Both ends of a freshly created pipe.
///
/// Right after a fork each process holds one of these and must split it,
/// closing the end it does not use.
pub struct Channel {
    pub read: ReadEnd,
    pub write: WriteEnd,
}

impl Channel {
    /// Create a pipe.
    pub fn create() -> io::Result<Channel> {
        let mut pipefd: [libc::c_int; 2] = [0, 0];
        let ret = unsafe { libc::pipe(pipefd.as_mut_ptr()) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: pipe() succeeded, so both descriptors are open and nothing else owns them.
        let (read, write) = unsafe {
            (
                OwnedFd::from_raw_fd(pipefd[0]),
                OwnedFd::from_raw_fd(pipefd[1]),
            )
        };
        log::debug!(
            "pipe created: read fd {}, write fd {}",
            read.as_raw_fd(),
            write.as_raw_fd()
        );

        Ok(Channel {
            read: ReadEnd(read),
            write: WriteEnd(write),
        })
    }
}

/// The readable end of a pipe.
#[derive(Debug)]
pub struct ReadEnd(OwnedFd);

/// The writable end of a pipe.
#[derive(Debug)]
pub struct WriteEnd(OwnedFd);

impl ReadEnd {
    pub fn close(self) -> io::Result<()> {
        close(self.0)
    }
}

impl WriteEnd {
    pub fn close(self) -> io::Result<()> {
        close(self.0)
    }
}

/// Close a descriptor and report the outcome.
///
/// The descriptor is released even when close(2) fails, so it is never retried.
fn close(fd: OwnedFd) -> io::Result<()> {
    let raw = fd.into_raw_fd();
    if unsafe { libc::close(raw) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl Read for ReadEnd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let ret = unsafe {
            libc::read(
                self.0.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }
}

impl Write for WriteEnd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let ret = unsafe {
            libc::write(
                self.0.as_raw_fd(),
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsRawFd for ReadEnd {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

impl AsRawFd for WriteEnd {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
