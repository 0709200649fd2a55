//! Copy configuration

/// Default transfer buffer size in bytes.
pub const BUFSIZE: usize = 8192;

/// Tunables for a single copy.
///
/// Built only through [`Default`] or [`Config::with_buffer_size`], so the
/// buffer size is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    buffer_size: usize,
}

impl Config {
    /// Returns `None` for a zero-sized buffer, which could never move a byte.
    pub fn with_buffer_size(buffer_size: usize) -> Option<Self> {
        if buffer_size == 0 {
            return None;
        }
        Some(Config { buffer_size })
    }

    /// Size of the buffer each process stages chunks in.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_size: BUFSIZE,
        }
    }
}
