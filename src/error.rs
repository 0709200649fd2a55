//! Unified error type for pipecopy operations.
//!
//! Every failure is terminal for the process that detects it. Library
//! functions return `Result<T, Error>` and leave presentation to the caller.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::process::ExitStatus;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Which side of the copy detected a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Producer,
    Consumer,
}

/// One end of the pipe channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Read,
    Write,
}

/// Where a chunk was being written when a short write happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// The producer writing into the pipe.
    Pipe,
    /// The consumer writing into the destination file.
    Destination,
}

#[derive(Debug)]
pub enum Error {
    /// The OS could not allocate a pipe.
    ChannelCreation(io::Error),
    /// The consumer process could not be forked.
    ProcessCreation(io::Error),
    /// An unused pipe end could not be closed after the fork.
    EndpointClose {
        role: Role,
        end: End,
        source: io::Error,
    },
    SourceOpen { path: PathBuf, source: io::Error },
    DestinationOpen { path: PathBuf, source: io::Error },
    /// A write accepted fewer bytes than it was given without reporting an error.
    ShortWrite {
        sink: Sink,
        written: usize,
        expected: usize,
    },
    PipeWrite(io::Error),
    PipeRead(io::Error),
    SourceRead(io::Error),
    DestinationWrite(io::Error),
    /// Waiting for the consumer process failed.
    Wait(io::Error),
    /// The consumer process terminated unsuccessfully.
    ConsumerFailed(ExitStatus),
}

impl Error {
    /// Build the error for a failed write into `sink`.
    pub(crate) fn write_failed(sink: Sink, source: io::Error) -> Self {
        match sink {
            Sink::Pipe => Error::PipeWrite(source),
            Sink::Destination => Error::DestinationWrite(source),
        }
    }

    /// True when the producer failed because the consumer already closed its read end.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::PipeWrite(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }

    /// The message followed by every underlying cause, separated by `: `.
    pub fn chain(&self) -> String {
        use std::error::Error as _;

        let mut message = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Producer => f.write_str("producer"),
            Role::Consumer => f.write_str("consumer"),
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Read => f.write_str("read end"),
            End::Write => f.write_str("write end"),
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Pipe => f.write_str("pipe"),
            Sink::Destination => f.write_str("destination file"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ChannelCreation(_) => write!(f, "could not create pipe"),
            Error::ProcessCreation(_) => write!(f, "could not create consumer process"),
            Error::EndpointClose { role, end, .. } => {
                write!(f, "{} could not close the pipe {}", role, end)
            }
            Error::SourceOpen { path, .. } => write!(
                f,
                "invalid source file {}: could not open file for reading",
                path.display()
            ),
            Error::DestinationOpen { path, .. } => write!(
                f,
                "invalid destination file {}: could not open file for writing",
                path.display()
            ),
            Error::ShortWrite {
                sink,
                written,
                expected,
            } => write!(
                f,
                "short write to {}: wrote {} of {} bytes",
                sink, written, expected
            ),
            Error::PipeWrite(_) => write!(f, "producer failed to write to pipe"),
            Error::PipeRead(_) => write!(f, "consumer failed to read from pipe"),
            Error::SourceRead(_) => write!(f, "producer failed to read from source"),
            Error::DestinationWrite(_) => {
                write!(f, "consumer failed to write to destination file")
            }
            Error::Wait(_) => write!(f, "could not wait for consumer process"),
            Error::ConsumerFailed(status) => write!(f, "consumer process {}", status),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ChannelCreation(e)
            | Error::ProcessCreation(e)
            | Error::PipeWrite(e)
            | Error::PipeRead(e)
            | Error::SourceRead(e)
            | Error::DestinationWrite(e)
            | Error::Wait(e) => Some(e),
            Error::EndpointClose { source, .. }
            | Error::SourceOpen { source, .. }
            | Error::DestinationOpen { source, .. } => Some(source),
            Error::ShortWrite { .. } | Error::ConsumerFailed(_) => None,
        }
    }
}
