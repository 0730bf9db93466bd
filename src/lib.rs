//! chunkio - Position-tracking stream reader with transparent gzip support.
//!
//! This library provides the low-level reading layer for line- and
//! record-oriented ingestion: it opens a file or standard input, decompresses
//! gzip content whether or not the file is named `.gz`, and tracks the byte
//! offset and line count of everything it hands out so parsers can report
//! "malformed record at line N, offset M" and resume where they stopped.
//!
//! # Features
//!
//! - Read from files, standard input (`-`), or any `Read` source
//! - Detect gzip by extension or by sniffing the first 512 bytes
//! - Read delimited chunks as bytes or text, or single UTF-8 characters
//! - Undo the last character read
//!
//! # Example
//!
//! ```no_run
//! use chunkio::{Chunk, StreamReader};
//!
//! let mut reader = StreamReader::open("records.txt.gz")?;
//! loop {
//!     match reader.read_until(b'\n')? {
//!         Chunk::Delimited(line) => { /* parse the record */ let _ = line; }
//!         Chunk::Eof(rest) => {
//!             if !rest.is_empty() { /* final record without newline */ }
//!             break;
//!         }
//!     }
//! }
//! println!("read {} lines, {} bytes", reader.line_count(), reader.offset());
//! reader.close();
//! # Ok::<(), chunkio::Error>(())
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod reader;
pub mod sniff;
pub mod source;
pub mod types;

pub use buffer::PeekReader;
pub use config::Config;
pub use error::{Error, Result};
pub use reader::StreamReader;
pub use sniff::ContentType;
pub use types::{Chunk, Position};
