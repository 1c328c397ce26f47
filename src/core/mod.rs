//! Core data types
//!
//! Interval entries, genome assemblies, error types and text input helpers
//! shared by every format adapter.

mod assembly;
mod entry;
mod error;
pub mod io;

pub use assembly::Assembly;
pub use entry::{IntervalEntry, Strand};
pub use error::{
    AssemblyError, AssemblyResult, ErrorKind, GenomicsError, IntervalFileError,
    IntervalFileResult, Result,
};
pub use io::{detect_compression, open_text, CompressionFormat, LineIterator, DEFAULT_BUFFER_SIZE};
