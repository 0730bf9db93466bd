//! Error types for chunkio.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Position;

/// Errors that can occur while opening or reading a stream.
#[derive(Error, Debug)]
pub enum Error {
    /// The named source could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source looked like gzip (or was named like it) but the decoder
    /// could not be initialised.
    #[error("{name}: not a valid gzip stream ({source})")]
    Decompression {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The source is exhausted.
    #[error("end of stream")]
    EndOfStream,

    /// No character read is available to undo.
    #[error("no character to unread")]
    Unread,

    /// An I/O error surfaced by the underlying source during a read.
    ///
    /// `partial` holds the bytes the failing read consumed before the error;
    /// they are included in the reader's offset and line count.
    #[error("{name}: read failed at {position}: {source}")]
    Read {
        name: String,
        position: Position,
        partial: Vec<u8>,
        #[source]
        source: io::Error,
    },

    /// A text read returned bytes that are not valid UTF-8.
    ///
    /// `eof` is set when the source ran out before the delimiter.
    #[error("{name}: invalid UTF-8 at {position}")]
    InvalidUtf8 {
        name: String,
        position: Position,
        bytes: Vec<u8>,
        eof: bool,
    },
}

impl Error {
    /// Returns true for the normal end-of-stream signal.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }

    /// Position a read-time error is attributed to, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Read { position, .. } | Error::InvalidUtf8 { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Bytes consumed by the call that failed, if any.
    pub fn partial(&self) -> &[u8] {
        match self {
            Error::Read { partial, .. } => partial.as_slice(),
            Error::InvalidUtf8 { bytes, .. } => bytes.as_slice(),
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_names_path() {
        let err = Error::Open {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to open missing.txt"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_decompression_error_is_terse() {
        let err = Error::Decompression {
            name: "data.gz".to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "invalid gzip header"),
        };
        assert_eq!(
            err.to_string(),
            "data.gz: not a valid gzip stream (invalid gzip header)"
        );
    }

    #[test]
    fn test_read_error_reports_position() {
        let err = Error::Read {
            name: "input.txt".to_string(),
            position: Position { offset: 42, line: 3 },
            partial: b"abc".to_vec(),
            source: io::Error::new(io::ErrorKind::Other, "disk on fire"),
        };
        assert_eq!(
            err.to_string(),
            "input.txt: read failed at line 4, offset 42: disk on fire"
        );
        assert_eq!(err.position(), Some(Position { offset: 42, line: 3 }));
        assert_eq!(err.partial(), b"abc");
    }

    #[test]
    fn test_is_eof() {
        assert!(Error::EndOfStream.is_eof());
        assert!(!Error::Unread.is_eof());
        assert_eq!(Error::EndOfStream.position(), None);
        assert!(Error::EndOfStream.partial().is_empty());
    }
}
