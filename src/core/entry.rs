//! Interval entries
//!
//! An [`IntervalEntry`] is a chromosome plus a `start`/`stop` pair. Strand is
//! not stored separately: `start <= stop` is the forward (Watson) strand and
//! `start > stop` is the reverse (Crick) strand. [`IntervalEntry::low`] and
//! [`IntervalEntry::high`] give the half-open `[low, high)` span regardless of
//! orientation.

use crate::core::error::{IntervalFileError, IntervalFileResult};
use std::fmt;

/// Strand orientation derived from start/stop ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    #[default]
    Watson,
    Crick,
}

impl Strand {
    pub fn to_char(&self) -> char {
        match self {
            Strand::Watson => '+',
            Strand::Crick => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A single interval record
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEntry {
    pub chrom: String,
    pub start: u64,
    pub stop: u64,
    pub id: Option<String>,
    pub value: Option<f64>,
    /// Positional fields after the strand marker, uninterpreted
    pub extras: Vec<String>,
}

impl IntervalEntry {
    pub fn new(chrom: impl Into<String>, start: u64, stop: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
            id: None,
            value: None,
            extras: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Build an entry from coordinates plus the positional extra fields of a
    /// BED-like record.
    ///
    /// Field 0 is the identifier, field 1 a numeric value and field 2 a strand
    /// marker; a `-` marker reverses a forward-oriented entry. Anything after
    /// field 2 lands in [`IntervalEntry::extras`].
    ///
    /// # Examples
    /// ```
    /// use genomics_io::IntervalEntry;
    ///
    /// let entry = IntervalEntry::from_fields("chr1", 100, 200, &["id1", "3.5", "-"])?;
    /// assert_eq!((entry.start, entry.stop), (200, 100));
    /// assert_eq!(entry.id.as_deref(), Some("id1"));
    /// assert_eq!(entry.value, Some(3.5));
    /// # Ok::<(), genomics_io::IntervalFileError>(())
    /// ```
    pub fn from_fields<S: AsRef<str>>(
        chrom: impl Into<String>,
        start: u64,
        stop: u64,
        fields: &[S],
    ) -> IntervalFileResult<Self> {
        let mut entry = Self::new(chrom, start, stop);

        if let Some(id) = fields.first() {
            entry.id = Some(id.as_ref().to_string());
        }

        if let Some(raw) = fields.get(1) {
            let raw = raw.as_ref();
            let value = raw.trim().parse::<f64>().map_err(|_| IntervalFileError::InvalidValue {
                field: "value",
                value: raw.to_string(),
            })?;
            entry.value = Some(value);
        }

        // Reverse start/stop if on the - strand
        if let Some(marker) = fields.get(2) {
            if marker.as_ref().eq_ignore_ascii_case("-") && entry.start < entry.stop {
                entry.reverse();
            }
        }

        if fields.len() > 3 {
            entry.extras = fields[3..].iter().map(|f| f.as_ref().to_string()).collect();
        }

        Ok(entry)
    }

    /// Swap start and stop, flipping the orientation
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.stop);
    }

    /// Smaller of start and stop (inclusive)
    pub fn low(&self) -> u64 {
        self.start.min(self.stop)
    }

    /// Larger of start and stop (exclusive)
    pub fn high(&self) -> u64 {
        self.start.max(self.stop)
    }

    pub fn length(&self) -> u64 {
        self.high() - self.low()
    }

    pub fn strand(&self) -> Strand {
        if self.is_watson() {
            Strand::Watson
        } else {
            Strand::Crick
        }
    }

    pub fn is_watson(&self) -> bool {
        self.start <= self.stop
    }

    pub fn is_crick(&self) -> bool {
        !self.is_watson()
    }

    /// Half-open overlap test of `[low, high)` against `[start, stop)`
    pub fn overlaps(&self, start: u64, stop: u64) -> bool {
        self.low() < stop && self.high() > start
    }
}

impl fmt::Display for IntervalEntry {
    /// BED6-style line: chrom, low, high, id, value, strand
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t",
            self.chrom,
            self.low(),
            self.high(),
            self.id.as_deref().unwrap_or(".")
        )?;
        match self.value {
            Some(v) => write!(f, "{}", v)?,
            None => write!(f, ".")?,
        }
        write!(f, "\t{}", self.strand())
    }
}
