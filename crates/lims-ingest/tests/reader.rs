//! File loading tests.

use std::fs;

use lims_ingest::{FieldMap, IngestError, load_source_file, sha256_hex};
use proptest::prelude::*;

#[test]
fn loads_utf8_file_with_bom() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.csv");
    fs::write(&path, "\u{feff}Header,Client name\nHeader Data,Acme\n").expect("write");

    let source = load_source_file(&path, 1024).expect("load");
    assert_eq!(source.filename, "order.csv");
    assert!(source.content.starts_with("Header"));
    assert_eq!(source.sha256, sha256_hex(source.content.as_bytes()));
}

#[test]
fn rejects_utf16_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.csv");
    fs::write(&path, [0xFF, 0xFE, b'H', 0]).expect("write");

    let err = load_source_file(&path, 1024).unwrap_err();
    assert!(matches!(
        err,
        IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
            ..
        }
    ));
}

#[test]
fn rejects_large_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.csv");
    fs::write(&path, "x".repeat(64)).expect("write");

    let err = load_source_file(&path, 16).unwrap_err();
    assert!(matches!(err, IngestError::FileTooLarge { size: 64, .. }));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_source_file(&dir.path().join("absent.csv"), 16).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

proptest! {
    #[test]
    fn taking_every_key_empties_the_map(keys in proptest::collection::vec("[A-Za-z]{1,6}", 0..12)) {
        let values: Vec<String> = (0..keys.len()).map(|i| i.to_string()).collect();
        let mut map = FieldMap::zip(&keys, &values);
        let distinct: Vec<String> = map.keys().map(str::to_string).collect();
        for key in &distinct {
            prop_assert!(map.take(key).is_some());
        }
        prop_assert!(map.is_empty());
    }

    #[test]
    fn zip_never_exceeds_either_side(
        names in proptest::collection::vec("[a-z]{1,4}", 0..8),
        values in proptest::collection::vec("[0-9]{0,3}", 0..8),
    ) {
        let map = FieldMap::zip(&names, &values);
        prop_assert!(map.len() <= names.len().min(values.len()));
    }
}
