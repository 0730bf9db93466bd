//! Core data types for chunkio.
//!
//! This module defines the position counters tracked while reading and the
//! result type returned by delimited reads.

use std::fmt;

/// Position within a stream, counted over the bytes yielded to the caller.
///
/// Both counters are 0-based: `offset` is the number of bytes consumed so
/// far and `line` the number of newlines among them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bytes consumed so far.
    pub offset: u64,
    /// Newlines consumed so far.
    pub line: u64,
}

impl Position {
    /// Create a position at the start of a stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance past `bytes`, counting the newlines among them.
    pub fn advance(&mut self, bytes: &[u8]) {
        self.offset += bytes.len() as u64;
        self.line += memchr::memchr_iter(b'\n', bytes).count() as u64;
    }
}

impl fmt::Display for Position {
    /// Lines are shown 1-based, offsets 0-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, offset {}", self.line + 1, self.offset)
    }
}

/// Result of a delimited read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk<T> {
    /// Data up to and including the delimiter.
    Delimited(T),
    /// The source ran out before the delimiter; the data may be empty.
    Eof(T),
}

impl<T> Chunk<T> {
    /// Returns true if the source was exhausted during this read.
    pub fn is_eof(&self) -> bool {
        matches!(self, Chunk::Eof(_))
    }

    /// Borrow the data regardless of how the read ended.
    pub fn get(&self) -> &T {
        match self {
            Chunk::Delimited(data) | Chunk::Eof(data) => data,
        }
    }

    /// Take the data regardless of how the read ended.
    pub fn into_inner(self) -> T {
        match self {
            Chunk::Delimited(data) | Chunk::Eof(data) => data,
        }
    }

    /// Apply `f` to the data, keeping the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Chunk<U> {
        match self {
            Chunk::Delimited(data) => Chunk::Delimited(f(data)),
            Chunk::Eof(data) => Chunk::Eof(f(data)),
        }
    }
}

impl<T: AsRef<[u8]>> Chunk<T> {
    /// Returns true if nothing was read.
    pub fn is_empty(&self) -> bool {
        self.get().as_ref().is_empty()
    }
}
