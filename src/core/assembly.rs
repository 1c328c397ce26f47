//! Genome assemblies
//!
//! Loads a chromosome size table (`<name>\t<length>` per line, the UCSC
//! `chrom.sizes` layout) and answers membership and length queries.
//!
//! # Example
//!
//! ```
//! use genomics_io::Assembly;
//!
//! let assembly: Assembly = "chr1\t500\nchr2\t300\n".parse()?;
//! assert!(assembly.includes("chr1"));
//! assert_eq!(assembly.length_of("chr2")?, 300);
//! assert!(!assembly.includes("chr3"));
//! # Ok::<(), genomics_io::AssemblyError>(())
//! ```

use crate::core::entry::IntervalEntry;
use crate::core::error::{AssemblyError, AssemblyResult};
use crate::core::io::{open_text, LineIterator};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

/// Chromosome name to length index
///
/// Immutable once loaded. Names iterate in the order they appeared in the
/// source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    names: Vec<String>,
    lengths: HashMap<String, u64>,
}

impl Assembly {
    /// Load an assembly from a file
    ///
    /// Automatically handles gzip and bzip2 compression.
    pub fn from_path<P: AsRef<Path>>(path: P) -> AssemblyResult<Self> {
        let path = path.as_ref();
        let assembly = Self::from_reader(open_text(path)?)?;
        log::debug!(
            "Loaded assembly {} with {} chromosomes",
            path.display(),
            assembly.len()
        );
        Ok(assembly)
    }

    /// Parse an assembly from any buffered source
    ///
    /// Every line must hold a name and a non-negative integer length separated
    /// by a tab. The first malformed line fails the whole load.
    pub fn from_reader<R: BufRead>(reader: R) -> AssemblyResult<Self> {
        let mut names = Vec::new();
        let mut lengths = HashMap::new();
        let mut lines = LineIterator::new(reader);

        loop {
            let line_number = lines.line_number() + 1;
            let line = match lines.next_line() {
                Some(line) => line?,
                None => break,
            };

            let (chrom, length) = line
                .split_once('\t')
                .ok_or(AssemblyError::MissingDelimiter { line: line_number })?;

            let length = length.parse::<u64>().map_err(|_| AssemblyError::InvalidLength {
                line: line_number,
                value: length.to_string(),
            })?;

            if lengths.insert(chrom.to_string(), length).is_some() {
                return Err(AssemblyError::DuplicateChromosome {
                    line: line_number,
                    chrom: chrom.to_string(),
                });
            }
            names.push(chrom.to_string());
        }

        Ok(Self { names, lengths })
    }

    /// Known chromosome names, in source order
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn includes(&self, chrom: &str) -> bool {
        self.lengths.contains_key(chrom)
    }

    /// Length of a chromosome, failing if it is not part of the assembly
    pub fn length_of(&self, chrom: &str) -> AssemblyResult<u64> {
        self.get(chrom)
            .ok_or_else(|| AssemblyError::ChromosomeNotFound(chrom.to_string()))
    }

    /// Length of a chromosome, or `None` if unknown
    pub fn get(&self, chrom: &str) -> Option<u64> {
        self.lengths.get(chrom).copied()
    }

    /// Number of chromosomes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over chromosome names; restartable
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    /// Check that an entry lies on a known chromosome and within its bounds
    pub fn validate(&self, entry: &IntervalEntry) -> AssemblyResult<()> {
        let length = self.length_of(&entry.chrom)?;
        if entry.high() > length {
            return Err(AssemblyError::OutOfBounds {
                chrom: entry.chrom.clone(),
                end: entry.high(),
                length,
            });
        }
        Ok(())
    }
}

impl FromStr for Assembly {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

impl<'a> IntoIterator for &'a Assembly {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
