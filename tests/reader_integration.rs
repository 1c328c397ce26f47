//! Integration tests for format detection and the reader factory

use genomics_io::formats::{self, BIGBED_MAGIC};
use genomics_io::{Assembly, ErrorKind, IntervalFormat, IntervalFileError};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_temp(content: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(content).unwrap();
    temp.flush().unwrap();
    temp
}

#[test]
fn test_open_detects_bed() {
    let temp = write_temp(b"chr1\t100\t200\tid1\t3.5\t-\nchr2\t10\t20\tid2\t1\t+\n");
    let mut reader = formats::open(temp.path()).unwrap();

    assert_eq!(reader.format(), IntervalFormat::Bed);
    assert_eq!(reader.path(), temp.path());
    assert_eq!(reader.count().unwrap(), 2);
    assert_eq!(reader.chromosomes().unwrap(), vec!["chr1", "chr2"]);

    let first = reader.iter().unwrap().next().unwrap().unwrap();
    assert_eq!((first.start, first.stop), (200, 100));
    assert_eq!(first.to_string(), "chr1\t100\t200\tid1\t3.5\t-");

    reader.close().unwrap();
    assert!(reader.is_closed());
}

#[test]
fn test_open_as_bigbed_rejects_text() {
    let temp = write_temp(b"chr1\t1\t2\n");
    let err = formats::open_as(temp.path(), IntervalFormat::BigBed).err().unwrap();
    assert!(matches!(
        err,
        IntervalFileError::NotFormat {
            format: IntervalFormat::BigBed,
            ..
        }
    ));
}

#[test]
fn test_open_as_bed_rejects_bigbed() {
    let temp = write_temp(&BIGBED_MAGIC.to_le_bytes());
    let err = formats::open_as(temp.path(), IntervalFormat::Bed).err().unwrap();
    assert!(err.is_kind(ErrorKind::Format));
}

#[test]
fn test_truncated_bigbed_fails_to_open() {
    let temp = write_temp(&BIGBED_MAGIC.to_le_bytes());
    assert_eq!(formats::sniff(temp.path()).unwrap(), IntervalFormat::BigBed);
    assert!(formats::open(temp.path()).is_err());
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let err = formats::open(dir.path().join("absent.bb")).err().unwrap();
    assert!(err.is_kind(ErrorKind::Io));
}

#[test]
fn test_empty_file_is_empty_bed() {
    let temp = write_temp(b"");
    let mut reader = formats::open(temp.path()).unwrap();
    assert_eq!(reader.format(), IntervalFormat::Bed);
    assert_eq!(reader.count().unwrap(), 0);
    assert!(reader.chromosomes().unwrap().is_empty());
}

#[test]
fn test_entries_validate_against_assembly() {
    let assembly: Assembly = "chr1\t150\nchr2\t300\n".parse().unwrap();
    let temp = write_temp(b"chr1\t100\t200\nchr2\t10\t20\nchr3\t1\t2\n");
    let mut reader = formats::open(temp.path()).unwrap();

    let results: Vec<_> = reader
        .iter()
        .unwrap()
        .map(|entry| assembly.validate(&entry.unwrap()).map_err(|e| e.kind()))
        .collect();

    assert_eq!(
        results,
        vec![Err(ErrorKind::Value), Ok(()), Err(ErrorKind::NotFound)]
    );
}
