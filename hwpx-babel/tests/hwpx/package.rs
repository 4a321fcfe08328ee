//! Zip container round trips.

use crate::common::{unzip, PROPOSAL_PARTS};
use hwpx_babel::formats::hwpx::{assemble, MIMETYPE, PART_PATHS};
use hwpx_babel::{convert, ConversionError};

#[test]
fn test_mimetype_is_first_and_stored() {
    let conversion = convert("# 제목\n\n본문\n").unwrap();
    let entries = unzip(&conversion.bytes);

    assert_eq!(entries[0].name, "mimetype");
    assert!(entries[0].stored);
    assert_eq!(entries[0].contents, MIMETYPE.as_bytes());
    assert!(entries[1..].iter().all(|entry| !entry.stored));
}

#[test]
fn test_every_required_part_is_present() {
    let bytes = assemble(&PROPOSAL_PARTS).unwrap();
    let names: Vec<String> = unzip(&bytes).into_iter().map(|e| e.name).collect();
    assert_eq!(names, PART_PATHS.to_vec());
}

#[test]
fn test_entries_round_trip_byte_for_byte() {
    let bytes = assemble(&PROPOSAL_PARTS).unwrap();
    for (entry, part) in unzip(&bytes).iter().zip(PROPOSAL_PARTS.iter()) {
        assert_eq!(entry.name, part.path);
        assert_eq!(entry.contents, part.payload, "{} differs", part.path);
    }
}

#[test]
fn test_assembly_is_deterministic() {
    let first = assemble(&PROPOSAL_PARTS).unwrap();
    let second = assemble(&PROPOSAL_PARTS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_misordered_parts_are_rejected() {
    let mut parts = (*PROPOSAL_PARTS).clone();
    parts.swap(0, 1);
    let err = assemble(&parts).unwrap_err();
    assert!(matches!(err, ConversionError::InvariantViolation(_)));
}

#[test]
fn test_preview_text_is_plain_and_bounded() {
    let long = "가나다라 ".repeat(1000);
    let conversion = convert(&long).unwrap();
    let entries = unzip(&conversion.bytes);
    let preview = entries
        .iter()
        .find(|e| e.name == "Preview/PrvText.txt")
        .expect("preview entry");
    let text = String::from_utf8(preview.contents.clone()).unwrap();
    assert_eq!(text.chars().count(), 1024);
    assert!(text.starts_with("가나다라"));
}
