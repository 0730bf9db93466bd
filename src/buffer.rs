//! Fixed-capacity lookahead buffer.
//!
//! [`PeekReader`] is the byte source every stream layer is read through: it
//! can look ahead without consuming (used for sniffing), serve `BufRead`
//! reads, and step back over bytes that are still buffered (used to unread a
//! character).

use std::io::{self, BufRead, Read};

use crate::config::{DEFAULT_BUFFER_CAPACITY, MIN_BUFFER_CAPACITY};

/// Buffered reader with non-consuming lookahead.
pub struct PeekReader<R> {
    inner: R,
    buf: Box<[u8]>,
    /// Start of unconsumed data.
    pos: usize,
    /// End of valid data.
    filled: usize,
}

impl<R: Read> PeekReader<R> {
    /// Create a reader with the default capacity.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY, inner)
    }

    /// Create a reader with `capacity` bytes of lookahead (at least 16).
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        let capacity = capacity.max(MIN_BUFFER_CAPACITY);
        PeekReader {
            inner,
            buf: vec![0; capacity].into_boxed_slice(),
            pos: 0,
            filled: 0,
        }
    }

    /// Size of the lookahead buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes buffered but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.filled - self.pos
    }

    /// Bytes buffered but not yet consumed, without reading more.
    pub fn buffer(&self) -> &[u8] {
        &self.buf[self.pos..self.filled]
    }

    /// Return up to `n` upcoming bytes without consuming them.
    ///
    /// Reads from the source until `n` bytes are buffered or it is exhausted,
    /// so a short result means end of stream. `n` is capped at the capacity.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        let n = n.min(self.buf.len());

        if self.buffered() < n {
            // Slide unconsumed bytes to the front to make room
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.filled, 0);
                self.filled -= self.pos;
                self.pos = 0;
            }

            while self.filled < n {
                match self.inner.read(&mut self.buf[self.filled..]) {
                    Ok(0) => break,
                    Ok(read) => self.filled += read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }

        let end = self.filled.min(self.pos + n);
        Ok(&self.buf[self.pos..end])
    }

    /// Step back over the last `n` consumed bytes.
    ///
    /// Returns false, leaving the reader unchanged, if those bytes are no
    /// longer in the buffer.
    pub fn unconsume(&mut self, n: usize) -> bool {
        if n > self.pos {
            return false;
        }
        self.pos -= n;
        true
    }
}

impl<R: Read> BufRead for PeekReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.filled {
            self.pos = 0;
            self.filled = 0;
            loop {
                match self.inner.read(&mut self.buf) {
                    Ok(read) => {
                        self.filled = read;
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}
