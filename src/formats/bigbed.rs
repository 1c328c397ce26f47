//! BigBed format adapter
//!
//! A BigBed file is a compressed, R-tree indexed binary form of BED. For more
//! information, see <http://genome.ucsc.edu/goldenPath/help/bigBed.html>.
//!
//! Decoding is delegated to a [`BigBedDecoder`]. [`BigtoolsDecoder`] is the
//! production implementation on top of `bigtools`; the reader itself only maps
//! raw records to [`IntervalEntry`] values.

use crate::core::{IntervalEntry, IntervalFileError, IntervalFileResult};
use crate::formats::{has_bigbed_magic, read_magic, Entries, IntervalFileReader, IntervalFormat};
use bigtools::BigBedRead;
use std::fmt::Display;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Boxed cursor over undecoded records
pub type RawRecords = Box<dyn Iterator<Item = IntervalFileResult<RawBedRecord>>>;

/// Chromosome entry of a BigBed chromosome index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromSize {
    pub name: String,
    pub length: u32,
}

/// A record as stored in the file: coordinates plus the remaining columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBedRecord {
    pub chrom: String,
    /// 0-based start
    pub start: u32,
    /// 0-based exclusive end
    pub end: u32,
    /// Columns after the third, as defined by the file's autoSql schema
    pub rest: Vec<String>,
}

impl RawBedRecord {
    /// Build a record from the tab-joined trailing columns of a BigBed item
    pub fn new(chrom: impl Into<String>, start: u32, end: u32, rest: &str) -> Self {
        let rest = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('\t').map(|s| s.to_string()).collect()
        };
        Self {
            chrom: chrom.into(),
            start,
            end,
            rest,
        }
    }

    /// Convert to an entry: id, value and strand come from `rest`
    pub fn into_entry(self) -> IntervalFileResult<IntervalEntry> {
        IntervalEntry::from_fields(self.chrom, self.start as u64, self.end as u64, &self.rest)
    }
}

/// The operations a BigBed reader needs from a decoder
///
/// Cursors returned by `records` and `overlapping` own whatever state they
/// need, so several may be alive at once.
pub trait BigBedDecoder {
    /// Chromosome index, in index order
    fn chroms(&self) -> Vec<ChromSize>;

    /// Item count stored in the file header
    fn count(&self) -> IntervalFileResult<u64>;

    /// Every record in storage order
    fn records(&self) -> IntervalFileResult<RawRecords>;

    /// Candidate records for `[start, end)` on `chrom`
    ///
    /// May include records that only touch the range; the reader applies the
    /// half-open test itself.
    fn overlapping(&self, chrom: &str, start: u32, end: u32) -> IntervalFileResult<RawRecords>;
}

fn decode_error<E: Display>(e: E) -> IntervalFileError {
    IntervalFileError::Decode(e.to_string())
}

/// [`BigBedDecoder`] backed by `bigtools`
///
/// The decoder keeps one open handle for the header and chromosome index.
/// Each cursor opens its own handle, which is released when the cursor is
/// dropped.
pub struct BigtoolsDecoder {
    path: PathBuf,
    read: BigBedRead<File>,
}

impl BigtoolsDecoder {
    pub fn open(path: &Path) -> IntervalFileResult<Self> {
        let read = Self::open_read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            read,
        })
    }

    fn open_read(path: &Path) -> IntervalFileResult<BigBedRead<File>> {
        let file = File::open(path)?;
        BigBedRead::open(file).map_err(decode_error)
    }

    fn interval(path: &Path, chrom: &str, start: u32, end: u32) -> IntervalFileResult<RawRecords> {
        let read = Self::open_read(path)?;
        let name = chrom.to_string();
        let intervals = read
            .get_interval_move(chrom, start, end)
            .map_err(decode_error)?;

        Ok(Box::new(intervals.map(move |entry| {
            entry
                .map(|e| RawBedRecord::new(name.clone(), e.start, e.end, &e.rest))
                .map_err(decode_error)
        })))
    }
}

impl BigBedDecoder for BigtoolsDecoder {
    fn chroms(&self) -> Vec<ChromSize> {
        self.read
            .chroms()
            .iter()
            .map(|c| ChromSize {
                name: c.name.clone(),
                length: c.length,
            })
            .collect()
    }

    fn count(&self) -> IntervalFileResult<u64> {
        let mut read = Self::open_read(&self.path)?;
        Ok(read.get_summary()?.total_items)
    }

    fn records(&self) -> IntervalFileResult<RawRecords> {
        // One chromosome at a time, so only one extra handle is open
        let path = self.path.clone();
        let records = self.chroms().into_iter().flat_map(move |chrom| -> RawRecords {
            match Self::interval(&path, &chrom.name, 0, chrom.length) {
                Ok(records) => records,
                Err(e) => Box::new(std::iter::once(Err(e))),
            }
        });
        Ok(Box::new(records))
    }

    fn overlapping(&self, chrom: &str, start: u32, end: u32) -> IntervalFileResult<RawRecords> {
        Self::interval(&self.path, chrom, start, end)
    }
}

/// [`IntervalFileReader`] for BigBed files
pub struct BigBedFileReader<D: BigBedDecoder = BigtoolsDecoder> {
    path: PathBuf,
    decoder: Option<D>,
    count: Option<u64>,
}

impl BigBedFileReader<BigtoolsDecoder> {
    /// Open a BigBed file, failing if it does not carry the BigBed signature
    pub fn open<P: AsRef<Path>>(path: P) -> IntervalFileResult<Self> {
        let path = path.as_ref();
        log::debug!("Opening BigBed file reader {}", path.display());

        if !has_bigbed_magic(&read_magic(path)?) {
            return Err(IntervalFileError::NotFormat {
                format: IntervalFormat::BigBed,
                path: path.to_path_buf(),
            });
        }

        let decoder = BigtoolsDecoder::open(path)?;
        Ok(Self::with_decoder(path, decoder))
    }
}

impl<D: BigBedDecoder> BigBedFileReader<D> {
    /// Wrap an already opened decoder
    pub fn with_decoder(path: impl Into<PathBuf>, decoder: D) -> Self {
        Self {
            path: path.into(),
            decoder: Some(decoder),
            count: None,
        }
    }

    fn decoder(&self) -> IntervalFileResult<&D> {
        self.decoder
            .as_ref()
            .ok_or_else(|| IntervalFileError::Closed(self.path.clone()))
    }

    /// Length of a chromosome according to the file's chromosome index
    pub fn chrom_length(&self, chrom: &str) -> IntervalFileResult<u64> {
        self.decoder()?
            .chroms()
            .into_iter()
            .find(|c| c.name == chrom)
            .map(|c| c.length as u64)
            .ok_or_else(|| IntervalFileError::ChromosomeNotFound(chrom.to_string()))
    }
}

impl<D: BigBedDecoder> IntervalFileReader for BigBedFileReader<D> {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> IntervalFormat {
        IntervalFormat::BigBed
    }

    fn is_closed(&self) -> bool {
        self.decoder.is_none()
    }

    fn count(&mut self) -> IntervalFileResult<u64> {
        let decoder = self.decoder()?;
        if let Some(count) = self.count {
            return Ok(count);
        }

        let count = decoder.count()?;
        self.count = Some(count);
        Ok(count)
    }

    /// Names from the chromosome index, which holds each name once
    fn chromosomes(&mut self) -> IntervalFileResult<Vec<String>> {
        Ok(self.decoder()?.chroms().into_iter().map(|c| c.name).collect())
    }

    fn iter(&mut self) -> IntervalFileResult<Entries> {
        let records = self.decoder()?.records()?;
        Ok(Entries::new(records.map(|r| r.and_then(RawBedRecord::into_entry))))
    }

    fn query(&mut self, chrom: &str, start: u64, stop: u64) -> IntervalFileResult<Entries> {
        let decoder = self.decoder()?;
        log::trace!("BigBed query {}:{}-{} on {}", chrom, start, stop, self.path.display());

        if start >= stop || start > u32::MAX as u64 {
            return Ok(Entries::empty());
        }
        if !decoder.chroms().iter().any(|c| c.name == chrom) {
            return Ok(Entries::empty());
        }

        let end = stop.min(u32::MAX as u64) as u32;
        let records = decoder
            .overlapping(chrom, start as u32, end)?
            .filter(move |r| match r {
                Ok(r) => (r.start as u64) < stop && (r.end as u64) > start,
                Err(_) => true,
            });
        Ok(Entries::new(records.map(|r| r.and_then(RawBedRecord::into_entry))))
    }

    fn close(&mut self) -> IntervalFileResult<()> {
        if self.decoder.take().is_some() {
            log::debug!("Closed BigBed file reader {}", self.path.display());
        }
        Ok(())
    }
}
