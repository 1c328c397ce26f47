//! Error types for genomics-io
//!
//! Defines all error types used throughout the library.

use crate::formats::bed::BedParseError;
use crate::formats::IntervalFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification shared by every error in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Signature or structure does not match the expected format
    Format,
    /// A numeric field could not be parsed or is out of range
    Value,
    /// The backing format cannot perform the requested operation
    Unsupported,
    /// Unknown chromosome in a metadata lookup
    NotFound,
    /// Operation on a reader that has been closed
    Closed,
    /// Underlying I/O or decoder failure
    Io,
}

/// Main error type for genomics-io operations
#[derive(Debug, Error)]
pub enum GenomicsError {
    /// Assembly loading or lookup errors
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Interval file reader errors
    #[error("Interval file error: {0}")]
    IntervalFile(#[from] IntervalFileError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenomicsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenomicsError::Assembly(e) => e.kind(),
            GenomicsError::IntervalFile(e) => e.kind(),
            GenomicsError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Errors that can occur while loading or querying an assembly
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Line without a tab between name and length
    #[error("Invalid format in assembly at line {line}: missing tab delimiter")]
    MissingDelimiter { line: usize },

    /// Length field is not a non-negative integer
    #[error("Invalid chromosome length '{value}' at line {line}")]
    InvalidLength { line: usize, value: String },

    /// Chromosome listed twice
    #[error("Duplicate chromosome '{chrom}' at line {line}")]
    DuplicateChromosome { line: usize, chrom: String },

    /// Chromosome not present in the assembly
    #[error("Chromosome not found in assembly: {0}")]
    ChromosomeNotFound(String),

    /// Interval extends past the end of its chromosome
    #[error("Interval end {end} exceeds length {length} of {chrom}")]
    OutOfBounds { chrom: String, end: u64, length: u64 },

    /// I/O error while reading the source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssemblyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssemblyError::MissingDelimiter { .. } | AssemblyError::DuplicateChromosome { .. } => {
                ErrorKind::Format
            }
            AssemblyError::InvalidLength { .. } | AssemblyError::OutOfBounds { .. } => {
                ErrorKind::Value
            }
            AssemblyError::ChromosomeNotFound(_) => ErrorKind::NotFound,
            AssemblyError::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this is a specific kind of error
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Errors raised by interval file readers and their cursors
#[derive(Debug, Error)]
pub enum IntervalFileError {
    /// File failed the format signature check
    #[error("Not a {format} file: {}", .path.display())]
    NotFormat { format: IntervalFormat, path: PathBuf },

    /// Numeric extra field could not be parsed
    #[error("Invalid numeric {field} field '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// Malformed line in a text interval file
    #[error("Invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: BedParseError,
    },

    /// Operation not available for this format
    #[error("{operation} is not supported for {format} files")]
    UnsupportedOperation {
        operation: &'static str,
        format: IntervalFormat,
    },

    /// Chromosome absent from the file's index
    #[error("Chromosome not found in file index: {0}")]
    ChromosomeNotFound(String),

    /// Reader used after close
    #[error("Reader for {} has been closed", .0.display())]
    Closed(PathBuf),

    /// Failure reported by an external decoder
    #[error("Decoder error: {0}")]
    Decode(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntervalFileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IntervalFileError::NotFormat { .. } => ErrorKind::Format,
            IntervalFileError::InvalidValue { .. } => ErrorKind::Value,
            IntervalFileError::InvalidRecord { source, .. } => match source {
                BedParseError::InvalidNumber(..) => ErrorKind::Value,
                _ => ErrorKind::Format,
            },
            IntervalFileError::UnsupportedOperation { .. } => ErrorKind::Unsupported,
            IntervalFileError::ChromosomeNotFound(_) => ErrorKind::NotFound,
            IntervalFileError::Closed(_) => ErrorKind::Closed,
            IntervalFileError::Decode(_) | IntervalFileError::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this is a specific kind of error
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Result type alias for genomics-io operations
pub type Result<T> = std::result::Result<T, GenomicsError>;

/// Result type alias for assembly operations
pub type AssemblyResult<T> = std::result::Result<T, AssemblyError>;

/// Result type alias for interval file operations
pub type IntervalFileResult<T> = std::result::Result<T, IntervalFileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_error_kinds() {
        assert!(AssemblyError::MissingDelimiter { line: 1 }.is_kind(ErrorKind::Format));
        assert!(AssemblyError::InvalidLength { line: 2, value: "x".into() }.is_kind(ErrorKind::Value));
        assert!(AssemblyError::ChromosomeNotFound("chr9".into()).is_kind(ErrorKind::NotFound));
    }

    #[test]
    fn test_interval_error_kinds() {
        let err = IntervalFileError::UnsupportedOperation {
            operation: "query",
            format: IntervalFormat::Bed,
        };
        assert!(err.is_kind(ErrorKind::Unsupported));
        assert_eq!(err.to_string(), "query is not supported for BED files");

        let err = IntervalFileError::InvalidRecord {
            line: 3,
            source: BedParseError::InvalidNumber("start", "abc".into()),
        };
        assert_eq!(err.kind(), ErrorKind::Value);

        let err = IntervalFileError::InvalidRecord {
            line: 3,
            source: BedParseError::TooFewFields { expected: 3, found: 1 },
        };
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: GenomicsError = IntervalFileError::Closed(PathBuf::from("a.bb")).into();
        assert!(err.is_kind(ErrorKind::Closed));
        assert_eq!(
            err.to_string(),
            "Interval file error: Reader for a.bb has been closed"
        );
    }

    #[test]
    fn test_not_format_display() {
        let err = IntervalFileError::NotFormat {
            format: IntervalFormat::BigBed,
            path: PathBuf::from("x.txt"),
        };
        assert_eq!(err.to_string(), "Not a BigBed file: x.txt");
    }
}
