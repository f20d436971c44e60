//! Stream files on disk

use crate::test_utils::*;
use snapdiff::{decode, read_stream, DecodeOptions, SourceError};
use std::fs;
use tempfile::TempDir;

#[test]
fn read_then_decode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snaps-diff");
    let buf = stream_bytes(&[mkfile("a"), rename("a", "b")]);
    fs::write(&path, &buf).unwrap();

    let bytes = read_stream(&path, false).unwrap();
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.commands.len(), 3);
    assert!(path.exists());
}

#[test]
fn delete_after_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snaps-diff");
    fs::write(&path, stream_bytes(&[])).unwrap();

    read_stream(&path, true).unwrap();
    assert!(!path.exists());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_stream(&dir.path().join("absent"), false).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
    assert!(err.to_string().contains("absent"));
}
