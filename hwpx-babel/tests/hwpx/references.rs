//! Well-formedness and id integrity of the emitted XML.

use crate::common::{model, part, PROPOSAL_PARTS};
use hwpx_babel::formats::hwpx::verify::verify_xml;
use hwpx_babel::formats::hwpx::{serialize, HEADER_PATH, SECTION_PATH};
use roxmltree::Document;
use std::collections::HashSet;

fn ids(doc: &Document, element: &str) -> HashSet<String> {
    doc.descendants()
        .filter(|n| n.tag_name().name() == element)
        .filter_map(|n| n.attribute("id"))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_every_xml_part_is_well_formed() {
    for part in PROPOSAL_PARTS.iter() {
        if part.media_type.ends_with("xml") {
            let text = std::str::from_utf8(&part.payload).unwrap();
            Document::parse(text).unwrap_or_else(|e| panic!("{}: {e}", part.path));
        }
    }
}

#[test]
fn test_section_references_resolve_in_header() {
    let header = Document::parse(part(&PROPOSAL_PARTS, HEADER_PATH)).unwrap();
    let section = Document::parse(part(&PROPOSAL_PARTS, SECTION_PATH)).unwrap();

    let checks = [
        ("charPrIDRef", "charPr"),
        ("paraPrIDRef", "paraPr"),
        ("styleIDRef", "style"),
        ("borderFillIDRef", "borderFill"),
    ];
    for (attribute, element) in checks {
        let defined = ids(&header, element);
        assert!(!defined.is_empty(), "no {element} definitions");
        for node in section.descendants() {
            if let Some(value) = node.attribute(attribute) {
                assert!(
                    defined.contains(value),
                    "<{}> {attribute}={value} has no {element}",
                    node.tag_name().name()
                );
            }
        }
    }
}

#[test]
fn test_definitions_are_unique_and_counted() {
    let header = Document::parse(part(&PROPOSAL_PARTS, HEADER_PATH)).unwrap();
    for list in header
        .descendants()
        .filter(|n| n.attribute("itemCnt").is_some())
    {
        let children = list.children().filter(|c| c.is_element()).count();
        assert_eq!(
            list.attribute("itemCnt"),
            Some(children.to_string().as_str()),
            "itemCnt of <{}>",
            list.tag_name().name()
        );
        let ids: Vec<&str> = list
            .children()
            .filter_map(|c| c.attribute("id"))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }
}

#[test]
fn test_first_paragraph_carries_section_properties() {
    let section = Document::parse(part(&PROPOSAL_PARTS, SECTION_PATH)).unwrap();
    let first = section
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "p")
        .unwrap();
    assert!(first.descendants().any(|n| n.tag_name().name() == "secPr"));
    assert!(first.descendants().any(|n| n.tag_name().name() == "colPr"));
}

#[test]
fn test_table_grid_matches_model() {
    let section = Document::parse(part(&PROPOSAL_PARTS, SECTION_PATH)).unwrap();
    let table = section
        .descendants()
        .find(|n| n.tag_name().name() == "tbl")
        .expect("table");
    assert_eq!(table.attribute("rowCnt"), Some("3"));
    assert_eq!(table.attribute("colCnt"), Some("3"));

    let rows: Vec<_> = table
        .children()
        .filter(|n| n.tag_name().name() == "tr")
        .collect();
    assert_eq!(rows.len(), 3);
    for row in rows {
        let cells = row
            .children()
            .filter(|n| n.tag_name().name() == "tc")
            .count();
        assert_eq!(cells, 3);
    }
}

#[test]
fn test_links_and_page_breaks_in_section() {
    let section = part(&PROPOSAL_PARTS, SECTION_PATH);
    assert_eq!(section.matches("<hp:fieldBegin").count(), 1);
    assert_eq!(section.matches("<hp:fieldEnd").count(), 1);
    assert!(section.contains("type=\"HYPERLINK\""));
    assert_eq!(section.matches("pageBreak=\"1\"").count(), 1);
}

#[test]
fn test_one_numbering_per_list() {
    let header = Document::parse(part(&PROPOSAL_PARTS, HEADER_PATH)).unwrap();
    let numberings = header
        .descendants()
        .filter(|n| n.tag_name().name() == "numbering")
        .count();
    // ordered list, its nested bullets, and the task list
    assert_eq!(numberings, 3);
}

#[test]
fn test_verifier_flags_a_dangling_reference() {
    let parts = serialize(&model("plain\n")).unwrap();
    let header = part(&parts, HEADER_PATH);
    let section = part(&parts, SECTION_PATH);
    assert!(verify_xml(header, section).is_ok());

    let broken = section.replacen("charPrIDRef=\"0\"", "charPrIDRef=\"999\"", 1);
    assert_ne!(broken, section);
    assert!(verify_xml(header, &broken).is_err());
}
