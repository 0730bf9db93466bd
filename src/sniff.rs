//! Content-type detection from a stream prefix.
//!
//! Only the leading [`SNIFF_LEN`] bytes are considered. Binary signatures
//! are matched exactly at the start of the data; anything without a known
//! signature is classified as text unless it contains control bytes that
//! never appear in text.

use crate::config::SNIFF_LEN;

/// Content type guessed from the first bytes of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Gzip,
    Zip,
    Pdf,
    PlainText,
    OctetStream,
}

const SIGNATURES: [(&[u8], ContentType); 3] = [
    (b"\x1f\x8b\x08", ContentType::Gzip),
    (b"PK\x03\x04", ContentType::Zip),
    (b"%PDF-", ContentType::Pdf),
];

impl ContentType {
    /// MIME type string for this content type.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Gzip => "application/x-gzip",
            ContentType::Zip => "application/zip",
            ContentType::Pdf => "application/pdf",
            ContentType::PlainText => "text/plain; charset=utf-8",
            ContentType::OctetStream => "application/octet-stream",
        }
    }

    /// Returns true if the content should be fed through a gzip decoder.
    pub fn is_gzip(&self) -> bool {
        *self == ContentType::Gzip
    }
}

/// Detect the content type of `prefix`.
pub fn detect(prefix: &[u8]) -> ContentType {
    let data = &prefix[..prefix.len().min(SNIFF_LEN)];

    for (magic, content_type) in SIGNATURES {
        if data.starts_with(magic) {
            return content_type;
        }
    }

    if data.iter().copied().any(is_binary_byte) {
        ContentType::OctetStream
    } else {
        ContentType::PlainText
    }
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}
