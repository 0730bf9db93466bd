//! Configuration and defaults for chunkio.
//!
//! This module contains the configuration structure and the constants that
//! control how sources are opened and buffered.

/// Default capacity of the lookahead buffer in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Smallest lookahead buffer that will be allocated.
pub const MIN_BUFFER_CAPACITY: usize = 16;

/// Number of leading bytes inspected when sniffing the content type.
pub const SNIFF_LEN: usize = 512;

/// Source name that selects standard input.
pub const STDIN_NAME: &str = "-";

/// Display name used for standard input.
pub const STDIN_DISPLAY_NAME: &str = "/dev/stdin";

/// File extension that is trusted to mean gzip without sniffing.
pub const GZIP_EXTENSION: &str = "gz";

/// Configuration for opening a [`StreamReader`](crate::StreamReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity of each lookahead buffer in bytes.
    pub buffer_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer capacity, raising it to [`MIN_BUFFER_CAPACITY`] if smaller.
    pub fn set_buffer_capacity(&mut self, capacity: usize) {
        self.buffer_capacity = capacity.max(MIN_BUFFER_CAPACITY);
    }

    /// Builder form of [`Config::set_buffer_capacity`].
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.set_buffer_capacity(capacity);
        self
    }
}
