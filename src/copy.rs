//! Copy orchestration
//!
//! Sets up the channel, forks the consumer, runs the producer in the original
//! process, and combines both outcomes. Once the consumer exists it is always
//! waited for, whichever side failed first.

use std::path::Path;

use crate::config::Config;
use crate::consumer;
use crate::error::{Error, Result};
use crate::pipe::Channel;
use crate::process::{self, ExitStatus, Fork};
use crate::producer;

/// Outcome of a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Bytes relayed through the pipe.
    pub bytes: u64,
    pub consumer: ExitStatus,
}

/// Copy `source` to `destination` through a pipe between two processes.
///
/// The source is opened before anything else, so a missing or unreadable
/// source never creates or truncates the destination.
///
/// # Safety
///
/// The calling process must be single-threaded, or every other thread must
/// be parked where it holds no lock. The consumer is created with fork(2)
/// and keeps running Rust code (allocation, file I/O, logging) until it
/// exits; a lock held by another thread at fork time would stay locked in
/// the child forever.
pub unsafe fn copy_file(
    source: &Path,
    destination: &Path,
    config: &Config,
) -> Result<CopyReport> {
    let source_file = producer::open_source(source)?;
    let channel = Channel::create().map_err(Error::ChannelCreation)?;

    // SAFETY: forwarded from this function's own contract.
    match unsafe { process::fork() }.map_err(Error::ProcessCreation)? {
        Fork::Child => {
            // The consumer only ever needs the channel.
            drop(source_file);
            consumer::exit_with(consumer::run(channel, destination, config))
        }
        Fork::Parent(child) => {
            log::debug!("forked consumer process {}", child.pid());
            let produced = producer::run(channel, source_file, config);
            let status = child.wait().map_err(Error::Wait);
            settle(produced, status)
        }
    }
}

/// Combine the producer's result with the consumer's exit status.
///
/// The copy succeeds only if both sides did. When both failed, the producer's
/// error wins, unless it was a broken pipe: that only happens because the
/// consumer quit early, so the consumer's failure is the one reported.
fn settle(produced: Result<u64>, consumer: Result<ExitStatus>) -> Result<CopyReport> {
    match (produced, consumer) {
        (Ok(bytes), Ok(status)) if status.success() => {
            log::debug!("copied {} bytes; consumer {}", bytes, status);
            Ok(CopyReport {
                bytes,
                consumer: status,
            })
        }
        (Ok(_), Ok(status)) => Err(Error::ConsumerFailed(status)),
        (Ok(_), Err(wait_err)) => Err(wait_err),
        (Err(err), Ok(status)) if err.is_broken_pipe() && !status.success() => {
            log::debug!("producer hit a broken pipe: {}", err.chain());
            Err(Error::ConsumerFailed(status))
        }
        (Err(err), Ok(status)) => {
            log::debug!("consumer {} after producer failure", status);
            Err(err)
        }
        (Err(err), Err(wait_err)) => {
            log::warn!("{}", wait_err.chain());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn broken_pipe() -> Error {
        Error::PipeWrite(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn source_read() -> Error {
        Error::SourceRead(io::Error::from(io::ErrorKind::Other))
    }

    fn wait_failed() -> Error {
        Error::Wait(io::Error::from_raw_os_error(libc::ECHILD))
    }

    #[test]
    fn both_sides_succeeding_is_success() {
        let report = settle(Ok(42), Ok(ExitStatus::Exited(0))).unwrap();
        assert_eq!(report.bytes, 42);
        assert_eq!(report.consumer, ExitStatus::Exited(0));
    }

    #[test]
    fn consumer_failure_fails_a_clean_producer() {
        let err = settle(Ok(0), Ok(ExitStatus::Exited(1))).unwrap_err();
        assert!(matches!(err, Error::ConsumerFailed(ExitStatus::Exited(1))));

        let err = settle(Ok(100), Ok(ExitStatus::Signaled(libc::SIGKILL))).unwrap_err();
        assert!(matches!(err, Error::ConsumerFailed(ExitStatus::Signaled(_))));
    }

    #[test]
    fn wait_failure_is_reported() {
        let err = settle(Ok(7), Err(wait_failed())).unwrap_err();
        assert!(matches!(err, Error::Wait(_)));
    }

    #[test]
    fn producer_error_wins_over_consumer_status() {
        let err = settle(Err(source_read()), Ok(ExitStatus::Exited(0))).unwrap_err();
        assert!(matches!(err, Error::SourceRead(_)));

        let err = settle(Err(source_read()), Ok(ExitStatus::Exited(1))).unwrap_err();
        assert!(matches!(err, Error::SourceRead(_)));

        let err = settle(Err(source_read()), Err(wait_failed())).unwrap_err();
        assert!(matches!(err, Error::SourceRead(_)));
    }

    #[test]
    fn broken_pipe_blames_the_failed_consumer() {
        let err = settle(Err(broken_pipe()), Ok(ExitStatus::Exited(1))).unwrap_err();
        assert!(matches!(err, Error::ConsumerFailed(ExitStatus::Exited(1))));

        // A consumer that exited cleanly cannot explain the broken pipe.
        let err = settle(Err(broken_pipe()), Ok(ExitStatus::Exited(0))).unwrap_err();
        assert!(err.is_broken_pipe());
    }
}
