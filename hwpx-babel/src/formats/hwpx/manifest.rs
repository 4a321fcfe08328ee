//! Package-level parts: the OPF manifest, container and version records,
//! application settings and the plain-text preview.

use crate::common::runs::runs_to_text;
use crate::error::ConversionError;
use crate::ir::nodes::{BinaryItem, BlockKind, DocumentModel, Metadata};

use super::xml::XmlWriter;
use super::{
    CONTENT_PATH, HEADER_PATH, NS_APP, NS_CONTAINER, NS_DC, NS_HPF, NS_MANIFEST, NS_OPF,
    NS_VERSION, PREVIEW_PATH, SECTION_PATH, SETTINGS_PATH,
};

/// Longest preview, in characters.
pub const PREVIEW_LIMIT: usize = 1024;

/// `(id, href, media-type)` of every item listed in `content.hpf`.
pub(crate) const MANIFEST_ITEMS: [(&str, &str, &str); 4] = [
    ("header", HEADER_PATH, "application/xml"),
    ("section0", SECTION_PATH, "application/xml"),
    ("settings", SETTINGS_PATH, "application/xml"),
    ("prvtext", PREVIEW_PATH, "text/plain"),
];

const SPINE: [&str; 2] = ["header", "section0"];

pub(crate) fn content_hpf(
    metadata: &Metadata,
    binaries: &[BinaryItem],
) -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("opf:package")
        .attr("xmlns:ha", NS_APP)
        .attr("xmlns:opf", NS_OPF)
        .attr("xmlns:dc", NS_DC)
        .attr("version", "")
        .attr("unique-identifier", "")
        .attr("id", "")
        .open()?;

    xml.element("opf:metadata").open()?;
    xml.element("opf:title")
        .text(metadata.title.as_deref().unwrap_or(""))?;
    xml.element("opf:language").text("ko")?;
    if let Some(author) = &metadata.author {
        xml.element("opf:meta")
            .attr("name", "creator")
            .attr("content", "text")
            .text(author)?;
    }
    if let Some(date) = &metadata.date {
        xml.element("opf:meta")
            .attr("name", "CreatedDate")
            .attr("content", "text")
            .text(date)?;
    }
    xml.close("opf:metadata")?;

    xml.element("opf:manifest").open()?;
    for (id, href, media_type) in MANIFEST_ITEMS {
        xml.element("opf:item")
            .attr("id", id)
            .attr("href", href)
            .attr("media-type", media_type)
            .empty()?;
    }
    for item in binaries {
        xml.element("opf:item")
            .attr("id", &item.id)
            .attr("href", item.path())
            .attr("media-type", item.media_type)
            .attr("isEmbeded", 1)
            .empty()?;
    }
    xml.close("opf:manifest")?;

    xml.element("opf:spine").open()?;
    for idref in SPINE {
        xml.element("opf:itemref")
            .attr("idref", idref)
            .attr("linear", "yes")
            .empty()?;
    }
    xml.close("opf:spine")?;

    xml.close("opf:package")?;
    Ok(xml.finish())
}

pub(crate) fn version_xml() -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    // "tagetApplication" is the attribute name Hancom readers expect
    xml.element("hv:HCFVersion")
        .attr("xmlns:hv", NS_VERSION)
        .attr("tagetApplication", "WORDPROCESSOR")
        .attr("major", 5)
        .attr("minor", 1)
        .attr("micro", 0)
        .attr("buildNumber", 1)
        .attr("os", 1)
        .attr("xmlVersion", "1.4")
        .attr("application", "md2hwpx")
        .attr("appVersion", env!("CARGO_PKG_VERSION"))
        .empty()?;
    Ok(xml.finish())
}

pub(crate) fn settings_xml() -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("ha:HWPApplicationSetting")
        .attr("xmlns:ha", NS_APP)
        .open()?;
    xml.element("ha:CaretPosition")
        .attr("listIDRef", 0)
        .attr("paraIDRef", 0)
        .attr("pos", 0)
        .empty()?;
    xml.close("ha:HWPApplicationSetting")?;
    Ok(xml.finish())
}

pub(crate) fn container_xml() -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("ocf:container")
        .attr("xmlns:ocf", NS_CONTAINER)
        .attr("xmlns:hpf", NS_HPF)
        .open()?;
    xml.element("ocf:rootfiles").open()?;
    xml.element("ocf:rootfile")
        .attr("full-path", CONTENT_PATH)
        .attr("media-type", "application/hwpml-package+xml")
        .empty()?;
    xml.element("ocf:rootfile")
        .attr("full-path", PREVIEW_PATH)
        .attr("media-type", "text/plain")
        .empty()?;
    xml.close("ocf:rootfiles")?;
    xml.close("ocf:container")?;
    Ok(xml.finish())
}

pub(crate) fn manifest_xml() -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("odf:manifest")
        .attr("xmlns:odf", NS_MANIFEST)
        .empty()?;
    Ok(xml.finish())
}

/// Plain-text rendering shown by file browsers, one line per paragraph and
/// tab-separated table cells.
pub fn preview_text(model: &DocumentModel) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in &model.blocks {
        match &block.kind {
            BlockKind::Heading { runs, .. }
            | BlockKind::Paragraph { runs }
            | BlockKind::ListItem { runs, .. } => lines.push(runs_to_text(runs)),
            BlockKind::Code { lines: code, .. } => lines.extend(code.iter().cloned()),
            BlockKind::Table(table) => {
                for row in &table.rows {
                    let cells: Vec<String> =
                        row.cells.iter().map(|cell| runs_to_text(cell)).collect();
                    lines.push(cells.join("\t"));
                }
            }
            BlockKind::Rule => lines.push(String::new()),
        }
    }
    lines.join("\r\n").chars().take(PREVIEW_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::flatten::build;
    use crate::formats::markdown::parse;

    #[test]
    fn content_hpf_carries_title_and_spine() {
        let metadata = Metadata {
            title: Some("A & B".to_string()),
            author: Some("Kim".to_string()),
            date: None,
        };
        let xml = String::from_utf8(content_hpf(&metadata, &[]).unwrap()).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let title = doc
            .descendants()
            .find(|n| n.tag_name().name() == "title")
            .and_then(|n| n.text());
        assert_eq!(title, Some("A & B"));
        let spine: Vec<_> = doc
            .descendants()
            .filter(|n| n.tag_name().name() == "itemref")
            .filter_map(|n| n.attribute("idref"))
            .collect();
        assert_eq!(spine, vec!["header", "section0"]);
        assert!(xml.contains("name=\"creator\""));
        assert!(!xml.contains("CreatedDate"));
    }

    #[test]
    fn binary_items_are_listed_as_embedded() {
        let item = BinaryItem {
            id: "image1".to_string(),
            extension: "jpg",
            media_type: "image/jpeg",
            data: vec![0xff, 0xd8],
        };
        let xml = String::from_utf8(content_hpf(&Metadata::default(), &[item]).unwrap()).unwrap();
        assert!(xml.contains(
            "<opf:item id=\"image1\" href=\"BinData/image1.jpg\" media-type=\"image/jpeg\" isEmbeded=\"1\"/>"
        ));
    }

    #[test]
    fn preview_is_truncated() {
        let source = "word ".repeat(600);
        let model = build(&parse(&source)).unwrap();
        assert_eq!(preview_text(&model).chars().count(), PREVIEW_LIMIT);
    }

    #[test]
    fn preview_lists_table_cells() {
        let model = build(&parse("# T\n\n| a | b |\n|---|---|\n| 1 | 2 |\n")).unwrap();
        assert_eq!(preview_text(&model), "T\r\na\tb\r\n1\t2");
    }
}
