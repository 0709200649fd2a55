//! pipecopy
//!
//! Copies a file by relaying it through a pipe between two processes: the
//! calling process reads the source and writes it into the pipe, and a forked
//! consumer drains the pipe into the destination. The pipe's bounded kernel
//! buffer is the only flow control; each side blocks when the buffer is full
//! or empty.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pipecopy::{copy_file, Config};
//!
//! // SAFETY: called before this program starts any other thread.
//! let report = unsafe {
//!     copy_file(Path::new("in.bin"), Path::new("out.bin"), &Config::default())?
//! };
//! println!("copied {} bytes", report.bytes);
//! # Ok::<(), pipecopy::Error>(())
//! ```

pub use config::{Config, BUFSIZE};
pub use copy::{copy_file, CopyReport};
pub use error::{Error, Result};
pub use process::ExitStatus;

pub mod config;
pub mod consumer;
pub mod copy;
pub mod error;
pub mod pipe;
pub mod process;
pub mod producer;
pub mod transfer;
