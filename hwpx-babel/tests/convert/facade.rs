//! End-to-end behavior of the conversion facade.

use crate::common::{unzip, PROPOSAL};
use hwpx_babel::formats::hwpx::SECTION_PATH;
use hwpx_babel::{convert, ConversionError, ConversionOptions, Converter, UnsupportedPolicy};

fn section_of(bytes: &[u8]) -> String {
    let entry = unzip(bytes)
        .into_iter()
        .find(|e| e.name == SECTION_PATH)
        .expect("section entry");
    String::from_utf8(entry.contents).unwrap()
}

#[test]
fn test_empty_input_converts() {
    let conversion = convert("").unwrap();
    assert_eq!(conversion.filename, "proposal.hwpx");

    let section = section_of(&conversion.bytes);
    let doc = roxmltree::Document::parse(&section).unwrap();
    let paragraphs = doc
        .root_element()
        .children()
        .filter(|n| n.tag_name().name() == "p")
        .count();
    assert_eq!(paragraphs, 1);
}

#[test]
fn test_filename_comes_from_title() {
    let conversion = convert(PROPOSAL).unwrap();
    assert_eq!(conversion.filename, "2025_사업_계획서.hwpx");

    let (bytes, filename) = conversion.into_parts();
    assert!(!bytes.is_empty());
    assert!(filename.ends_with(".hwpx"));
}

#[test]
fn test_custom_default_filename() {
    let converter = Converter::new(ConversionOptions {
        default_filename: "memo.hwpx".to_string(),
        ..ConversionOptions::default()
    });
    assert_eq!(converter.convert("no title\n").unwrap().filename, "memo.hwpx");
}

#[test]
fn test_bytes_input() {
    let converter = Converter::default();
    let plain = converter.convert_bytes("# 제목\n".as_bytes()).unwrap();
    let with_bom = converter
        .convert_bytes("\u{feff}# 제목\n".as_bytes())
        .unwrap();
    assert_eq!(plain, with_bom);

    let err = converter.convert_bytes(&[0xed, 0xa0, 0x80]).unwrap_err();
    assert!(matches!(err, ConversionError::Input(_)));
}

#[test]
fn test_strict_converter_rejects_html() {
    let converter = Converter::new(ConversionOptions {
        unsupported: UnsupportedPolicy::Reject,
        ..ConversionOptions::default()
    });
    let err = converter.convert("<table><tr><td>x</td></tr></table>\n").unwrap_err();
    assert!(err.to_string().contains("raw HTML block (line 1)"));

    let degraded = Converter::default()
        .convert("<table><tr><td>x</td></tr></table>\n")
        .unwrap();
    assert!(section_of(&degraded.bytes).contains("&lt;td&gt;x&lt;/td&gt;"));
}

#[test]
fn test_parallel_conversions_match_sequential() {
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("# 문서 {i}\n\n{}\n\n- a\n- b {i}\n", "본문 ".repeat(i + 1)))
        .collect();
    let sequential: Vec<Vec<u8>> = inputs
        .iter()
        .map(|text| convert(text).unwrap().bytes)
        .collect();

    let converter = &Converter::default();
    let parallel: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| scope.spawn(move || converter.convert(text).unwrap().bytes))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(parallel, sequential);
}
