//! Text input helpers
//!
//! Opens plain, gzip or bzip2 text sources behind a single `BufRead` and
//! provides a line iterator that reuses its buffer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of a text source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Classify leading bytes of a file
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.len() >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
            CompressionFormat::Gzip
        } else if magic.len() >= 3 && &magic[..3] == b"BZh" {
            CompressionFormat::Bzip2
        } else {
            CompressionFormat::Plain
        }
    }
}

/// Detect compression format from file path and/or content
///
/// The extension wins when it is `.gz` or `.bz2`; otherwise the magic bytes
/// decide.
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "gz" => return Ok(CompressionFormat::Gzip),
        "bz2" => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;
    Ok(CompressionFormat::from_magic(&magic[..bytes_read]))
}

/// Open a text file, transparently decompressing gzip and bzip2
pub fn open_text(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = match format {
        CompressionFormat::Gzip => {
            let decoder = flate2::read::MultiGzDecoder::new(file);
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder))
        }
        CompressionFormat::Bzip2 => {
            let decoder = bzip2::read::BzDecoder::new(file);
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder))
        }
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Line iterator that reuses a buffer to avoid allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Read the next line into the internal buffer
    /// Returns None at EOF, Some(Ok(&str)) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&str>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                self.line_number += 1;
                // Remove trailing newline
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// 1-based number of the line most recently returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_buffer_size() {
        assert_eq!(DEFAULT_BUFFER_SIZE, 128 * 1024);
    }

    #[test]
    fn test_compression_from_magic() {
        assert_eq!(CompressionFormat::from_magic(&[0x1f, 0x8b, 0x08]), CompressionFormat::Gzip);
        assert_eq!(CompressionFormat::from_magic(b"BZh"), CompressionFormat::Bzip2);
        assert_eq!(CompressionFormat::from_magic(b"chr"), CompressionFormat::Plain);
        assert_eq!(CompressionFormat::from_magic(b""), CompressionFormat::Plain);
    }

    #[test]
    fn test_open_plain_text() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        write!(temp, "chr1\t100\n")?;
        temp.flush()?;

        let mut reader = open_text(temp.path())?;
        let mut line = String::new();
        reader.read_line(&mut line)?;
        assert_eq!(line, "chr1\t100\n");
        Ok(())
    }

    #[test]
    fn test_open_gzip_by_magic() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"chr2\t200\n")?;
        temp.write_all(&encoder.finish()?)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);
        let mut iter = LineIterator::new(open_text(temp.path())?);
        assert_eq!(iter.next_line().unwrap()?, "chr2\t200");
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_line_iterator() -> io::Result<()> {
        let data: &[u8] = b"line1\r\nline2\nline3";
        let mut iter = LineIterator::new(data);

        assert_eq!(iter.next_line().unwrap()?, "line1");
        assert_eq!(iter.next_line().unwrap()?, "line2");
        assert_eq!(iter.line_number(), 2);
        assert_eq!(iter.next_line().unwrap()?, "line3");
        assert!(iter.next_line().is_none());
        assert_eq!(iter.line_number(), 3);
        Ok(())
    }
}
