//! Raw source acquisition and decompression layering.
//!
//! A source is opened from a name (`-` for standard input), then wrapped in a
//! gzip decoder when its extension or its content says so. The result is
//! always a [`PeekReader`], so callers read compressed and plain sources the
//! same way.

use flate2::bufread::MultiGzDecoder;
use flate2::read::MultiGzDecoder as ReadMultiGzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, trace};

use crate::buffer::PeekReader;
use crate::config::{Config, GZIP_EXTENSION, SNIFF_LEN, STDIN_DISPLAY_NAME, STDIN_NAME};
use crate::error::{Error, Result};
use crate::sniff::{self, ContentType};

/// Boxed raw byte source.
pub type RawSource = Box<dyn Read + Send>;

/// Final buffered stream handed to the reader.
pub type Stream = PeekReader<RawSource>;

/// Open `name` for reading, returning the display name and the raw source.
///
/// `-` selects standard input, which is displayed as `/dev/stdin`.
pub fn open_raw(name: &str) -> Result<(String, RawSource)> {
    if name == STDIN_NAME {
        return Ok((STDIN_DISPLAY_NAME.to_string(), Box::new(io::stdin())));
    }

    let file = File::open(name).map_err(|source| Error::Open {
        path: name.into(),
        source,
    })?;
    Ok((name.to_string(), Box::new(file)))
}

/// Returns true if `name` carries the gzip file extension.
pub fn has_gzip_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == GZIP_EXTENSION)
}

/// Layered stream built over a raw source.
pub struct Layered {
    pub stream: Stream,
    pub compressed: bool,
    pub content_type: Option<ContentType>,
}

/// Wrap `raw` in buffering and, when needed, a gzip decoder.
///
/// A `.gz` name is trusted without looking at the data. Otherwise the first
/// [`SNIFF_LEN`] bytes are peeked and the decoder is attached only if they
/// look like gzip. A decoder that cannot read its header fails with
/// [`Error::Decompression`].
pub fn layer(name: &str, raw: RawSource, config: &Config) -> Result<Layered> {
    let capacity = config.buffer_capacity;

    if has_gzip_extension(name) {
        trace!(input = name, "gzip extension, skipping content sniffing");
        let decoder: RawSource = Box::new(ReadMultiGzDecoder::new(raw));
        let stream = check_decoder(name, PeekReader::with_capacity(capacity, decoder))?;
        return Ok(Layered {
            stream,
            compressed: true,
            content_type: None,
        });
    }

    let mut buffered = PeekReader::with_capacity(capacity, raw);
    let sniffed = buffered.peek(SNIFF_LEN).map(sniff::detect);
    let content_type = match sniffed {
        Ok(content_type) => content_type,
        Err(e) => {
            // Sniff what arrived; the error resurfaces on the first read
            debug!(input = name, error = %e, "short read while sniffing");
            sniff::detect(buffered.buffer())
        }
    };
    trace!(input = name, mime = content_type.mime(), "sniffed content type");

    if content_type.is_gzip() {
        let decoder: RawSource = Box::new(MultiGzDecoder::new(buffered));
        let stream = check_decoder(name, PeekReader::with_capacity(capacity, decoder))?;
        Ok(Layered {
            stream,
            compressed: true,
            content_type: Some(content_type),
        })
    } else {
        Ok(Layered {
            stream: buffered,
            compressed: false,
            content_type: Some(content_type),
        })
    }
}

/// Force the decoder to parse its header so a bad stream fails now rather
/// than on the first read. Nothing is consumed.
fn check_decoder(name: &str, mut stream: Stream) -> Result<Stream> {
    if let Err(source) = stream.peek(1) {
        debug!(input = name, error = %source, "gzip decoder failed to initialise");
        return Err(Error::Decompression {
            name: name.to_string(),
            source,
        });
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn raw(data: Vec<u8>) -> RawSource {
        Box::new(Cursor::new(data))
    }

    fn read_all(mut stream: Stream) -> Vec<u8> {
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_has_gzip_extension() {
        assert!(has_gzip_extension("data.txt.gz"));
        assert!(has_gzip_extension("/tmp/x/data.gz"));
        assert!(!has_gzip_extension("data.gzip"));
        assert!(!has_gzip_extension("data.GZ"));
        assert!(!has_gzip_extension("gz"));
        assert!(!has_gzip_extension("/dev/stdin"));
    }

    #[test]
    fn test_layer_plain() {
        let layered = layer("data.txt", raw(b"plain\ntext\n".to_vec()), &Config::new()).unwrap();
        assert!(!layered.compressed);
        assert_eq!(layered.content_type, Some(ContentType::PlainText));
        assert_eq!(read_all(layered.stream), b"plain\ntext\n");
    }

    #[test]
    fn test_layer_sniffs_gzip_without_extension() {
        let layered = layer("data.txt", raw(gzip(b"hidden gzip\n")), &Config::new()).unwrap();
        assert!(layered.compressed);
        assert_eq!(layered.content_type, Some(ContentType::Gzip));
        assert_eq!(read_all(layered.stream), b"hidden gzip\n");
    }

    #[test]
    fn test_layer_trusts_gzip_extension() {
        let layered = layer("data.gz", raw(gzip(b"named gzip\n")), &Config::new()).unwrap();
        assert!(layered.compressed);
        assert_eq!(layered.content_type, None);
        assert_eq!(read_all(layered.stream), b"named gzip\n");
    }

    #[test]
    fn test_layer_plain_text_named_gz_fails() {
        let result = layer("data.gz", raw(b"this is not gzip at all\n".to_vec()), &Config::new());
        assert!(matches!(result, Err(Error::Decompression { .. })));
    }

    #[test]
    fn test_layer_multi_member_gzip() {
        let mut data = gzip(b"first\n");
        data.extend(gzip(b"second\n"));
        let layered = layer("members", raw(data), &Config::new()).unwrap();
        assert_eq!(read_all(layered.stream), b"first\nsecond\n");
    }

    #[test]
    fn test_layer_small_buffer() {
        let content = b"0123456789".repeat(20);
        let layered = layer("small", raw(gzip(&content)), &Config::new().with_buffer_capacity(16)).unwrap();
        assert!(layered.compressed);
        assert_eq!(read_all(layered.stream), content);
    }

    #[test]
    fn test_open_raw_missing_file() {
        let result = open_raw("/definitely/not/here.txt");
        match result {
            Err(Error::Open { path, .. }) => assert_eq!(path, Path::new("/definitely/not/here.txt")),
            _ => panic!("expected open error"),
        }
    }

    #[test]
    fn test_open_raw_stdin_display_name() {
        let (name, _) = open_raw("-").unwrap();
        assert_eq!(name, "/dev/stdin");
    }
}
