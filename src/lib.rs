//! genomics-io - uniform readers for genomic interval files
//!
//! Reads interval annotations keyed by chromosome and a `[start, stop)` range
//! from BigBed and BED files through one [`IntervalFileReader`] trait, and
//! loads chromosome size tables into an [`Assembly`].
//!
//! # Features
//!
//! - Format detection from the file signature
//! - Indexed range queries on BigBed files via `bigtools`
//! - Lazy cursors: nothing is loaded beyond what the decoder buffers
//! - Transparent gzip/bzip2 for text sources
//!
//! # Example
//!
//! ```ignore
//! use genomics_io::{formats, Assembly};
//!
//! let assembly = Assembly::from_path("hg38.chrom.sizes")?;
//! let mut reader = formats::open("genes.bb")?;
//!
//! for entry in reader.query("chr2", 1000, 2000)? {
//!     let entry = entry?;
//!     assembly.validate(&entry)?;
//!     println!("{}", entry);
//! }
//! reader.close()?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use self::core::{
    Assembly, AssemblyError, AssemblyResult, ErrorKind, GenomicsError, IntervalEntry,
    IntervalFileError, IntervalFileResult, Result, Strand,
};
pub use formats::{open, open_as, sniff, Entries, IntervalFileReader, IntervalFormat};
