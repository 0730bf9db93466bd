//! Position-tracking stream reader.
//!
//! [`StreamReader`] wraps a file, standard input, or any other byte source,
//! transparently decompresses gzip content, and counts the bytes and
//! newlines it hands out so record parsers can report exact positions.

use std::io::{BufRead, Read};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::{self, Stream};
use crate::types::{Chunk, Position};

/// Snapshot taken before the most recent character read.
#[derive(Debug, Clone, Copy)]
struct Undo {
    position: Position,
    width: usize,
}

/// Buffered reader that tracks its byte offset and line count.
///
/// Offsets count the bytes yielded to the caller, which are the decompressed
/// bytes when the source is gzip. The reader owns every layer it opened;
/// [`StreamReader::close`] (or dropping the reader) releases them.
pub struct StreamReader {
    stream: Stream,
    name: String,
    compressed: bool,
    position: Position,
    undo: Option<Undo>,
}

impl StreamReader {
    /// Open `name` with the default configuration.
    ///
    /// `-` reads standard input. Gzip content is detected from the `.gz`
    /// extension or, failing that, from the leading bytes.
    pub fn open(name: &str) -> Result<Self> {
        Self::open_with(name, &Config::default())
    }

    /// Open `name` with an explicit configuration.
    pub fn open_with(name: &str, config: &Config) -> Result<Self> {
        let (name, raw) = source::open_raw(name)?;
        Self::build(name, raw, config)
    }

    /// Wrap an arbitrary byte source, such as a network body.
    ///
    /// `name` is used in diagnostics and for the `.gz` extension check.
    pub fn from_reader<R: Read + Send + 'static>(name: &str, reader: R) -> Result<Self> {
        Self::from_reader_with(name, reader, &Config::default())
    }

    /// [`StreamReader::from_reader`] with an explicit configuration.
    pub fn from_reader_with<R: Read + Send + 'static>(
        name: &str,
        reader: R,
        config: &Config,
    ) -> Result<Self> {
        Self::build(name.to_string(), Box::new(reader), config)
    }

    fn build(name: String, raw: source::RawSource, config: &Config) -> Result<Self> {
        let layered = source::layer(&name, raw, config)?;
        debug!(
            input = %name,
            compressed = layered.compressed,
            mime = layered.content_type.map(|t| t.mime()),
            "opened stream"
        );

        Ok(StreamReader {
            stream: layered.stream,
            name,
            compressed: layered.compressed,
            position: Position::new(),
            undo: None,
        })
    }

    /// Display name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if a gzip decoder is attached.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Number of bytes read so far.
    pub fn offset(&self) -> u64 {
        self.position.offset
    }

    /// Number of newlines read so far.
    pub fn line_count(&self) -> u64 {
        self.position.line
    }

    /// Current offset and line count.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Read up to and including `delim`.
    ///
    /// If the source runs out first, the remaining bytes (possibly none) are
    /// returned as [`Chunk::Eof`]. Check the data before acting on the end
    /// of stream: the last record of a file often has no trailing delimiter.
    pub fn read_until(&mut self, delim: u8) -> Result<Chunk<Vec<u8>>> {
        self.undo = None;
        let start = self.position;

        let mut buf = Vec::new();
        let result = self.stream.read_until(delim, &mut buf);
        // Bytes appended before a failure were consumed; they are counted
        // and handed back inside the error
        self.position.advance(&buf);

        if let Err(source) = result {
            return Err(Error::Read {
                name: self.name.clone(),
                position: start,
                partial: buf,
                source,
            });
        }

        if buf.last() == Some(&delim) {
            Ok(Chunk::Delimited(buf))
        } else {
            Ok(Chunk::Eof(buf))
        }
    }

    /// Read up to and including `delim` as UTF-8 text.
    ///
    /// Invalid UTF-8 is still consumed and counted; the bytes are returned
    /// inside [`Error::InvalidUtf8`], whose `eof` flag tells whether the
    /// source is exhausted.
    pub fn read_text(&mut self, delim: u8) -> Result<Chunk<String>> {
        let start = self.position;
        let chunk = self.read_until(delim)?;
        let eof = chunk.is_eof();

        match String::from_utf8(chunk.into_inner()) {
            Ok(text) if eof => Ok(Chunk::Eof(text)),
            Ok(text) => Ok(Chunk::Delimited(text)),
            Err(e) => Err(Error::InvalidUtf8 {
                name: self.name.clone(),
                position: start,
                bytes: e.into_bytes(),
                eof,
            }),
        }
    }

    /// Read one newline-terminated line as text.
    pub fn read_line(&mut self) -> Result<Chunk<String>> {
        self.read_text(b'\n')
    }

    /// Decode one UTF-8 character and return it with its width in bytes.
    ///
    /// Invalid or truncated sequences yield `U+FFFD` with a width of 1.
    /// Fails with [`Error::EndOfStream`] once the source is exhausted.
    pub fn read_char(&mut self) -> Result<(char, usize)> {
        self.undo = None;
        let before = self.position;

        let lead = match self.stream.peek(1) {
            Ok([]) => return Err(Error::EndOfStream),
            Ok(bytes) => bytes[0],
            Err(source) => {
                return Err(Error::Read {
                    name: self.name.clone(),
                    position: before,
                    partial: Vec::new(),
                    source,
                })
            }
        };

        // Only wait for continuation bytes the lead byte asks for
        let needed = utf8_width(lead);
        if needed > 1 {
            if let Err(e) = self.stream.peek(needed).map(|_| ()) {
                // Decode what arrived; the error resurfaces on the next read
                debug!(input = %self.name, error = %e, "short read inside character");
            }
        }

        let (ch, width) = decode_char(self.stream.buffer());
        self.stream.consume(width);
        self.position.offset += width as u64;
        if ch == '\n' {
            self.position.line += 1;
        }

        self.undo = Some(Undo {
            position: before,
            width,
        });
        Ok((ch, width))
    }

    /// Push back the character returned by the last [`StreamReader::read_char`].
    ///
    /// Only valid directly after a successful character read; fails with
    /// [`Error::Unread`] otherwise, leaving the counters untouched.
    pub fn unread_char(&mut self) -> Result<()> {
        let undo = self.undo.take().ok_or(Error::Unread)?;
        if !self.stream.unconsume(undo.width) {
            return Err(Error::Unread);
        }
        self.position = undo.position;
        Ok(())
    }

    /// Release the stream and every layer under it.
    pub fn close(self) {
        debug!(
            input = %self.name,
            offset = self.position.offset,
            lines = self.position.line,
            "closing stream"
        );
        drop(self.stream);
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

/// Decode the character at the start of `bytes`, which must not be empty.
fn decode_char(bytes: &[u8]) -> (char, usize) {
    let width = utf8_width(bytes[0]);
    if width == 1 {
        return (bytes[0] as char, 1);
    }
    if width == 0 || bytes.len() < width {
        return (char::REPLACEMENT_CHARACTER, 1);
    }
    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => (ch, width),
            None => (char::REPLACEMENT_CHARACTER, 1),
        },
        Err(_) => (char::REPLACEMENT_CHARACTER, 1),
    }
}
