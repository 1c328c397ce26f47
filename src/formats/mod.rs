//! Interval file readers
//!
//! Every on-disk format is wrapped in a type implementing [`IntervalFileReader`].
//! [`open`] sniffs the file signature and picks the adapter; [`open_as`] skips
//! the sniffing when the caller already knows the format.
//!
//! Readers are driven through `&mut self` and are not meant to be shared
//! between threads. Separate readers over the same file are independent.

pub mod bed;
pub mod bigbed;

pub use bed::{BedFileReader, BedParseError, BedRecordView};
pub use bigbed::{BigBedDecoder, BigBedFileReader, BigtoolsDecoder, ChromSize, RawBedRecord};

use crate::core::{IntervalEntry, IntervalFileResult};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// BigBed magic number, stored in the file's own byte order
pub const BIGBED_MAGIC: u32 = 0x8789_F2EB;

/// Supported interval file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalFormat {
    /// Compressed, R-tree indexed binary format
    BigBed,
    /// Tab-separated text, optionally gzip/bzip2 compressed
    Bed,
}

impl IntervalFormat {
    pub fn name(&self) -> &'static str {
        match self {
            IntervalFormat::BigBed => "BigBed",
            IntervalFormat::Bed => "BED",
        }
    }

    /// Whether the format carries a spatial index for range queries
    pub fn is_indexed(&self) -> bool {
        matches!(self, IntervalFormat::BigBed)
    }

    /// Guess the format from a file extension
    ///
    /// # Examples
    /// ```
    /// use genomics_io::formats::IntervalFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(IntervalFormat::from_path(Path::new("genes.bb")), Some(IntervalFormat::BigBed));
    /// assert_eq!(IntervalFormat::from_path(Path::new("peaks.bed.gz")), Some(IntervalFormat::Bed));
    /// assert_eq!(IntervalFormat::from_path(Path::new("reads.bam")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bz2"))
            .unwrap_or(&name);

        if name.ends_with(".bb") || name.ends_with(".bigbed") {
            Some(IntervalFormat::BigBed)
        } else if name.ends_with(".bed") {
            Some(IntervalFormat::Bed)
        } else {
            None
        }
    }
}

impl fmt::Display for IntervalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// True if the leading bytes carry the BigBed signature in either byte order
pub fn has_bigbed_magic(bytes: &[u8]) -> bool {
    match bytes.get(..4) {
        Some(head) => {
            let head = [head[0], head[1], head[2], head[3]];
            u32::from_le_bytes(head) == BIGBED_MAGIC || u32::from_be_bytes(head) == BIGBED_MAGIC
        }
        None => false,
    }
}

/// Read the file signature
pub(crate) fn read_magic(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(magic[..filled].to_vec())
}

/// Detect the format of a file from its signature
///
/// Files carrying the BigBed magic are BigBed; everything else is treated as
/// BED text.
pub fn sniff<P: AsRef<Path>>(path: P) -> io::Result<IntervalFormat> {
    let path = path.as_ref();
    let format = if has_bigbed_magic(&read_magic(path)?) {
        IntervalFormat::BigBed
    } else {
        IntervalFormat::Bed
    };
    log::debug!("Detected {} format for {}", format, path.display());
    Ok(format)
}

/// Open an interval file, detecting its format from the signature
pub fn open<P: AsRef<Path>>(path: P) -> IntervalFileResult<Box<dyn IntervalFileReader>> {
    let path = path.as_ref();
    let format = sniff(path)?;
    open_as(path, format)
}

/// Open an interval file as a specific format
pub fn open_as<P: AsRef<Path>>(
    path: P,
    format: IntervalFormat,
) -> IntervalFileResult<Box<dyn IntervalFileReader>> {
    let path = path.as_ref();
    match format {
        IntervalFormat::BigBed => Ok(Box::new(BigBedFileReader::open(path)?)),
        IntervalFormat::Bed => Ok(Box::new(BedFileReader::open(path)?)),
    }
}

/// Uniform access to interval records stored in one file
///
/// A reader is open from construction until [`close`](Self::close). Closing
/// twice is allowed; any other call after closing fails with
/// [`IntervalFileError::Closed`](crate::IntervalFileError::Closed). Dropping a
/// reader also releases its handle.
pub trait IntervalFileReader {
    /// Path of the backing file
    fn path(&self) -> &Path;

    fn format(&self) -> IntervalFormat;

    fn is_closed(&self) -> bool;

    /// Total number of records; scanned once, then cached
    fn count(&mut self) -> IntervalFileResult<u64>;

    /// Chromosomes present in the file, without duplicates
    fn chromosomes(&mut self) -> IntervalFileResult<Vec<String>>;

    /// Every record in native storage order
    fn iter(&mut self) -> IntervalFileResult<Entries>;

    /// Records overlapping the half-open range `[start, stop)` on `chrom`
    ///
    /// A chromosome missing from the file yields an empty cursor. Formats
    /// without a spatial index fail with
    /// [`IntervalFileError::UnsupportedOperation`](crate::IntervalFileError::UnsupportedOperation).
    fn query(&mut self, chrom: &str, start: u64, stop: u64) -> IntervalFileResult<Entries>;

    /// Release the underlying handle
    fn close(&mut self) -> IntervalFileResult<()>;
}

/// Lazy, forward-only cursor over interval entries
///
/// Each cursor is independent of the reader that produced it and of other
/// cursors. The first error ends the sequence.
pub struct Entries {
    inner: Box<dyn Iterator<Item = IntervalFileResult<IntervalEntry>>>,
    failed: bool,
}

impl Entries {
    pub fn new<I>(inner: I) -> Self
    where
        I: Iterator<Item = IntervalFileResult<IntervalEntry>> + 'static,
    {
        Self {
            inner: Box::new(inner),
            failed: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for Entries {
    type Item = IntervalFileResult<IntervalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.inner.next();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

impl fmt::Debug for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries").field("failed", &self.failed).finish()
    }
}
