//! Integration tests for the container reader.

mod common;

use common::{build_container, zip_archive, RawEntry, DOCUMENT_PATH};
use docpdf::archive::{entries, find_and_inflate, CompressionMethod};
use docpdf::error::{ArchiveError, Error};
use proptest::prelude::*;

fn archive_error(result: docpdf::Result<Vec<u8>>) -> ArchiveError {
    match result {
        Err(Error::Archive(e)) => e,
        other => panic!("expected archive error, got {:?}", other),
    }
}

#[test]
fn test_reads_zip_crate_output_stored_and_deflated() {
    let body = b"<w:document>hello</w:document>".repeat(20);
    for deflated in [false, true] {
        let data = zip_archive(
            &[("docProps/app.xml", b"<x/>".as_slice()), (DOCUMENT_PATH, body.as_slice())],
            deflated,
        );
        assert_eq!(find_and_inflate(&data, DOCUMENT_PATH).unwrap(), body);
    }
}

#[test]
fn test_lists_entries_in_directory_order() {
    let data = zip_archive(&[("a.txt", b"a".as_slice()), ("b/c.txt", b"bc".as_slice())], true);
    let names: Vec<String> = entries(&data)
        .unwrap()
        .map(|e| e.unwrap().name)
        .collect();
    assert_eq!(names, vec!["a.txt", "b/c.txt"]);
}

#[test]
fn test_hand_built_stored_and_deflated() {
    let data = build_container(&[
        RawEntry::stored("first.txt", b"stored bytes"),
        RawEntry::deflated(DOCUMENT_PATH, b"deflated document body"),
    ]);
    assert_eq!(find_and_inflate(&data, "first.txt").unwrap(), b"stored bytes");
    assert_eq!(
        find_and_inflate(&data, DOCUMENT_PATH).unwrap(),
        b"deflated document body"
    );

    let methods: Vec<_> = entries(&data).unwrap().map(|e| e.unwrap().method).collect();
    assert_eq!(methods, vec![CompressionMethod::Stored, CompressionMethod::Deflate]);
}

#[test]
fn test_empty_payloads() {
    let data = build_container(&[
        RawEntry::stored("empty.txt", b""),
        RawEntry::deflated(DOCUMENT_PATH, b""),
    ]);
    assert!(find_and_inflate(&data, "empty.txt").unwrap().is_empty());
    assert!(find_and_inflate(&data, DOCUMENT_PATH).unwrap().is_empty());
}

#[test]
fn test_local_extra_length_differs_from_central() {
    let mut entry = RawEntry::deflated(DOCUMENT_PATH, b"payload after a longer local extra");
    entry.local_extra = vec![0xAB; 28];
    entry.central_extra = vec![0xCD; 4];
    let data = build_container(&[entry]);
    assert_eq!(
        find_and_inflate(&data, DOCUMENT_PATH).unwrap(),
        b"payload after a longer local extra"
    );
}

#[test]
fn test_missing_directory() {
    assert_eq!(
        archive_error(find_and_inflate(b"definitely not a zip", DOCUMENT_PATH)),
        ArchiveError::MissingDirectory
    );
    assert_eq!(archive_error(find_and_inflate(b"", DOCUMENT_PATH)), ArchiveError::MissingDirectory);
}

#[test]
fn test_entry_not_found() {
    let data = build_container(&[RawEntry::stored("other.xml", b"x")]);
    assert_eq!(
        archive_error(find_and_inflate(&data, DOCUMENT_PATH)),
        ArchiveError::EntryNotFound(DOCUMENT_PATH.to_string())
    );
}

#[test]
fn test_bad_local_header() {
    let mut entry = RawEntry::stored(DOCUMENT_PATH, b"x");
    entry.local_signature = 0xDEAD_BEEF;
    let data = build_container(&[entry]);
    assert_eq!(
        archive_error(find_and_inflate(&data, DOCUMENT_PATH)),
        ArchiveError::BadLocalHeader
    );
}

#[test]
fn test_unsupported_method() {
    let mut entry = RawEntry::stored(DOCUMENT_PATH, b"x");
    entry.method = 12;
    let data = build_container(&[entry]);
    assert_eq!(
        archive_error(find_and_inflate(&data, DOCUMENT_PATH)),
        ArchiveError::UnsupportedMethod(12)
    );
}

#[test]
fn test_unexpected_size() {
    let mut entry = RawEntry::deflated(DOCUMENT_PATH, b"twelve bytes");
    entry.uncompressed_size = 99;
    let data = build_container(&[entry]);
    assert_eq!(
        archive_error(find_and_inflate(&data, DOCUMENT_PATH)),
        ArchiveError::UnexpectedSize {
            expected: 99,
            actual: 12
        }
    );
}

#[test]
fn test_corrupt_central_record() {
    let data = build_container(&[RawEntry::stored(DOCUMENT_PATH, b"x")]);
    let cd_start = data.len() - 22 - (46 + DOCUMENT_PATH.len());
    let mut broken = data.clone();
    broken[cd_start] = 0;
    assert_eq!(
        archive_error(find_and_inflate(&broken, DOCUMENT_PATH)),
        ArchiveError::CorruptEntry
    );
}

#[test]
fn test_garbage_deflate_stream() {
    let mut entry = RawEntry::stored(DOCUMENT_PATH, &[0xFF; 16]);
    entry.method = 8;
    let data = build_container(&[entry]);
    assert!(matches!(
        archive_error(find_and_inflate(&data, DOCUMENT_PATH)),
        ArchiveError::Inflate(_) | ArchiveError::UnexpectedSize { .. }
    ));
}

proptest! {
    #[test]
    fn test_any_payload_reads_back(
        payload in proptest::collection::vec(any::<u8>(), 0..4096),
        deflated in any::<bool>(),
    ) {
        let data = zip_archive(&[(DOCUMENT_PATH, payload.as_slice())], deflated);
        prop_assert_eq!(find_and_inflate(&data, DOCUMENT_PATH).unwrap(), payload);
    }
}
