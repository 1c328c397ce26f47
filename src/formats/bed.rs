//! BED format adapter
//!
//! Reads BED3 through BED12 text files (plain, gzip or bzip2). BED has no
//! spatial index, so only full iteration is available; range queries fail
//! with an unsupported-operation error.
//!
//! Columns after the third follow the same mapping as BigBed extra fields:
//! name becomes the id, score the value, and a `-` strand reverses the entry.

use crate::core::{open_text, IntervalEntry, IntervalFileError, IntervalFileResult, LineIterator};
use crate::formats::{has_bigbed_magic, read_magic, Entries, IntervalFileReader, IntervalFormat};
use memchr::memchr;
use std::collections::HashSet;
use std::io::{BufRead, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};

/// Zero-copy BED record view for parsing
/// Only parses coordinate fields immediately, other fields are kept as byte slices
pub struct BedRecordView<'a> {
    /// Original line bytes
    line: &'a [u8],
    /// Chromosome name
    pub chrom: &'a str,
    /// Start position (0-based)
    pub start: u64,
    /// End position
    pub end: u64,
    /// Field boundaries (start, end) for lazy access
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> BedRecordView<'a> {
    /// Parse a BED line with minimal allocation
    /// Only parses chrom, start, end immediately
    pub fn parse(line: &'a [u8]) -> Result<Self, BedParseError> {
        if line.is_empty() {
            return Err(BedParseError::EmptyLine);
        }

        // Find field boundaries using memchr for tab characters
        let mut field_bounds = Vec::with_capacity(12);
        let mut field_start = 0;
        while let Some(tab) = memchr(b'\t', &line[field_start..]) {
            field_bounds.push((field_start, field_start + tab));
            field_start += tab + 1;
        }
        field_bounds.push((field_start, line.len()));

        // Need at least 3 fields (BED3)
        if field_bounds.len() < 3 {
            return Err(BedParseError::TooFewFields {
                expected: 3,
                found: field_bounds.len(),
            });
        }

        let chrom = field_str(line, field_bounds[0], "chrom")?;
        if chrom.is_empty() {
            return Err(BedParseError::EmptyChrom);
        }

        let start_str = field_str(line, field_bounds[1], "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("start", start_str.to_string()))?;

        let end_str = field_str(line, field_bounds[2], "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("end", end_str.to_string()))?;

        Ok(Self {
            line,
            chrom,
            start,
            end,
            field_bounds,
        })
    }

    /// Get the number of fields
    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Get field as string slice (lazy access)
    pub fn field(&self, index: usize) -> Option<&'a str> {
        let line = self.line;
        self.field_bounds
            .get(index)
            .and_then(|&(start, end)| std::str::from_utf8(&line[start..end]).ok())
    }

    /// Fields after the coordinates, in order
    pub fn rest(&self) -> Result<Vec<&'a str>, BedParseError> {
        (3..self.field_count())
            .map(|i| self.field(i).ok_or(BedParseError::InvalidUtf8("extra")))
            .collect()
    }
}

fn field_str<'a>(
    line: &'a [u8],
    (start, end): (usize, usize),
    name: &'static str,
) -> Result<&'a str, BedParseError> {
    std::str::from_utf8(&line[start..end]).map_err(|_| BedParseError::InvalidUtf8(name))
}

/// BED parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Empty chromosome name")]
    EmptyChrom,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),
}

/// Browser/track lines, comments and blank lines carry no record
fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed == "track"
        || trimmed.starts_with("track ")
        || trimmed.starts_with("track\t")
        || trimmed == "browser"
        || trimmed.starts_with("browser ")
        || trimmed.starts_with("browser\t")
}

fn parse_entry(line: &str, line_number: usize) -> IntervalFileResult<IntervalEntry> {
    let invalid = |source| IntervalFileError::InvalidRecord {
        line: line_number,
        source,
    };
    let view = BedRecordView::parse(line.as_bytes()).map_err(invalid)?;
    let rest = view.rest().map_err(invalid)?;
    IntervalEntry::from_fields(view.chrom, view.start, view.end, &rest)
}

/// Cursor over the records of one BED file
struct BedLines {
    lines: LineIterator<Box<dyn BufRead>>,
}

impl BedLines {
    fn open(path: &Path) -> IntervalFileResult<Self> {
        Ok(Self {
            lines: LineIterator::new(open_text(path)?),
        })
    }
}

impl Iterator for BedLines {
    type Item = IntervalFileResult<IntervalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line_number = self.lines.line_number() + 1;
            let line = match self.lines.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if is_header(line) {
                continue;
            }
            return Some(parse_entry(line, line_number));
        }
    }
}

/// [`IntervalFileReader`] for BED text files
///
/// Each cursor opens the file anew. Count and chromosome set are gathered by
/// one scan on first use.
#[derive(Debug)]
pub struct BedFileReader {
    path: PathBuf,
    closed: bool,
    count: Option<u64>,
    chroms: Option<Vec<String>>,
}

impl BedFileReader {
    /// Open a BED file
    ///
    /// Fails with a format error when the file is a BigBed file, is not text,
    /// or its first record does not parse as BED.
    pub fn open<P: AsRef<Path>>(path: P) -> IntervalFileResult<Self> {
        let path = path.as_ref();
        log::debug!("Opening BED file reader {}", path.display());

        let not_bed = || IntervalFileError::NotFormat {
            format: IntervalFormat::Bed,
            path: path.to_path_buf(),
        };

        if has_bigbed_magic(&read_magic(path)?) {
            return Err(not_bed());
        }
        match BedLines::open(path)?.next() {
            Some(Err(IntervalFileError::InvalidRecord { .. })) => return Err(not_bed()),
            Some(Err(IntervalFileError::Io(e))) if e.kind() == IoErrorKind::InvalidData => {
                return Err(not_bed())
            }
            Some(Err(e)) => return Err(e),
            _ => {}
        }

        Ok(Self {
            path: path.to_path_buf(),
            closed: false,
            count: None,
            chroms: None,
        })
    }

    fn ensure_open(&self) -> IntervalFileResult<()> {
        if self.closed {
            return Err(IntervalFileError::Closed(self.path.clone()));
        }
        Ok(())
    }

    /// Single pass collecting count and chromosomes
    fn scan(&mut self) -> IntervalFileResult<()> {
        if self.count.is_some() {
            return Ok(());
        }

        let mut count = 0;
        let mut seen = HashSet::new();
        let mut chroms = Vec::new();
        for entry in BedLines::open(&self.path)? {
            let entry = entry?;
            count += 1;
            if !seen.contains(&entry.chrom) {
                seen.insert(entry.chrom.clone());
                chroms.push(entry.chrom);
            }
        }

        log::debug!(
            "Scanned {}: {} records on {} chromosomes",
            self.path.display(),
            count,
            chroms.len()
        );
        self.count = Some(count);
        self.chroms = Some(chroms);
        Ok(())
    }
}

impl IntervalFileReader for BedFileReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> IntervalFormat {
        IntervalFormat::Bed
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn count(&mut self) -> IntervalFileResult<u64> {
        self.ensure_open()?;
        self.scan()?;
        Ok(self.count.unwrap_or_default())
    }

    fn chromosomes(&mut self) -> IntervalFileResult<Vec<String>> {
        self.ensure_open()?;
        self.scan()?;
        Ok(self.chroms.clone().unwrap_or_default())
    }

    fn iter(&mut self) -> IntervalFileResult<Entries> {
        self.ensure_open()?;
        Ok(Entries::new(BedLines::open(&self.path)?))
    }

    fn query(&mut self, _chrom: &str, _start: u64, _stop: u64) -> IntervalFileResult<Entries> {
        self.ensure_open()?;
        Err(IntervalFileError::UnsupportedOperation {
            operation: "query",
            format: IntervalFormat::Bed,
        })
    }

    fn close(&mut self) -> IntervalFileResult<()> {
        if !self.closed {
            self.closed = true;
            log::debug!("Closed BED file reader {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn bed_file(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_parse_bed3() {
        let view = BedRecordView::parse(b"chr1\t100\t200").unwrap();
        assert_eq!(view.chrom, "chr1");
        assert_eq!(view.start, 100);
        assert_eq!(view.end, 200);
        assert_eq!(view.field_count(), 3);
        assert!(view.field(3).is_none());
        assert!(view.rest().unwrap().is_empty());
    }

    #[test]
    fn test_parse_bed6() {
        let view = BedRecordView::parse(b"chr1\t100\t200\tgene1\t500\t-").unwrap();
        assert_eq!(view.rest().unwrap(), vec!["gene1", "500", "-"]);

        let entry = parse_entry("chr1\t100\t200\tgene1\t500\t-", 1).unwrap();
        assert_eq!((entry.start, entry.stop), (200, 100));
        assert_eq!(entry.value, Some(500.0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(BedRecordView::parse(b""), Err(BedParseError::EmptyLine)));
        assert!(matches!(
            BedRecordView::parse(b"chr1\t100"),
            Err(BedParseError::TooFewFields { expected: 3, found: 2 })
        ));
        assert!(matches!(
            BedRecordView::parse(b"chr1\tabc\t200"),
            Err(BedParseError::InvalidNumber("start", _))
        ));
        assert!(matches!(
            BedRecordView::parse(b"\t1\t2"),
            Err(BedParseError::EmptyChrom)
        ));
    }

    #[test]
    fn test_header_lines() {
        assert!(is_header(""));
        assert!(is_header("# comment"));
        assert!(is_header("track name=peaks"));
        assert!(is_header("browser position chr1:1-100"));
        assert!(!is_header("chr1\t1\t2"));
        assert!(!is_header("trackless\t1\t2"));
    }

    #[test]
    fn test_iterate_skips_headers() {
        let temp = bed_file("track name=x\n# c\nchr1\t10\t20\ta\nchr2\t5\t6\n\n");
        let mut reader = BedFileReader::open(temp.path()).unwrap();
        let entries: Vec<IntervalEntry> = reader.iter().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_deref(), Some("a"));
        assert_eq!(entries[1].chrom, "chr2");
    }

    #[test]
    fn test_count_and_chromosomes() {
        let temp = bed_file("chr2\t1\t2\nchr1\t1\t2\nchr2\t3\t4\n");
        let mut reader = BedFileReader::open(temp.path()).unwrap();
        assert_eq!(reader.count().unwrap(), 3);
        assert_eq!(reader.chromosomes().unwrap(), vec!["chr2", "chr1"]);
    }

    #[test]
    fn test_query_unsupported() {
        let temp = bed_file("chr1\t1\t2\n");
        let mut reader = BedFileReader::open(temp.path()).unwrap();
        let err = reader.query("chr1", 0, 10).unwrap_err();
        assert!(err.is_kind(ErrorKind::Unsupported));
    }

    #[test]
    fn test_error_carries_line_number() {
        let temp = bed_file("chr1\t1\t2\nchr1\tx\t2\nchr1\t3\t4\n");
        let mut reader = BedFileReader::open(temp.path()).unwrap();
        let results: Vec<_> = reader.iter().unwrap().collect();
        assert_eq!(results.len(), 2);
        match &results[1] {
            Err(IntervalFileError::InvalidRecord { line, .. }) => assert_eq!(*line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(reader.count().unwrap_err().is_kind(ErrorKind::Value));
    }

    #[test]
    fn test_open_rejects_non_bed() {
        let temp = bed_file("this is not a bed file\n");
        let err = BedFileReader::open(temp.path()).unwrap_err();
        assert!(err.is_kind(ErrorKind::Format));
    }

    #[test]
    fn test_close_semantics() {
        let temp = bed_file("chr1\t1\t2\n");
        let mut reader = BedFileReader::open(temp.path()).unwrap();
        reader.close().unwrap();
        reader.close().unwrap();
        assert!(reader.is_closed());
        assert!(reader.iter().unwrap_err().is_kind(ErrorKind::Closed));
        assert!(reader.query("chr1", 0, 1).unwrap_err().is_kind(ErrorKind::Closed));
    }
}
