//! Structural self-check of a serialized package.
//!
//! The header and section are re-parsed and every id reference the section
//! (and the header itself) makes is resolved against the definitions in the
//! header. Pictures must resolve to an item of `content.hpf`, and every item
//! there must be a part of the package. A failure here is a bug in the
//! serializer, never a problem with the input, so it surfaces as
//! [`ConversionError::InvariantViolation`].

use std::collections::{HashMap, HashSet};

use roxmltree::{Document, Node};

use crate::error::ConversionError;

use super::manifest::MANIFEST_ITEMS;
use super::{PackagePart, CONTENT_PATH, HEADER_PATH, MIMETYPE_PATH, SECTION_PATH};

/// Definitions found in the header, keyed by element name.
#[derive(Debug, Default)]
struct Definitions {
    ids: HashMap<&'static str, HashSet<u32>>,
    fonts_per_face: usize,
}

impl Definitions {
    fn has(&self, kind: &'static str, id: u32) -> bool {
        self.ids.get(kind).is_some_and(|ids| ids.contains(&id))
    }
}

/// `(element, first id)` for every id-bearing list in the header.
const DEFINED: [(&str, u32); 5] = [
    ("charPr", 0),
    ("paraPr", 0),
    ("style", 0),
    ("borderFill", 1),
    ("numbering", 1),
];

/// Reference attributes and the definition each must resolve to.
const REFERENCES: [(&str, &str); 4] = [
    ("charPrIDRef", "charPr"),
    ("paraPrIDRef", "paraPr"),
    ("styleIDRef", "style"),
    ("borderFillIDRef", "borderFill"),
];

/// Verify a complete part list as produced by the serializer.
pub fn verify_package(parts: &[PackagePart]) -> Result<(), ConversionError> {
    let part = |path: &str| {
        parts
            .iter()
            .find(|part| part.path == path)
            .ok_or_else(|| ConversionError::invariant(format!("missing part {path}")))
    };

    if parts.first().map(|part| part.path.as_str()) != Some(MIMETYPE_PATH) {
        return Err(ConversionError::invariant("mimetype must be the first part"));
    }
    for (_, href, _) in MANIFEST_ITEMS {
        part(href)?;
    }

    let header = utf8(part(HEADER_PATH)?)?;
    let section = utf8(part(SECTION_PATH)?)?;
    verify_xml(header, section)?;

    let content = parse_xml(CONTENT_PATH, utf8(part(CONTENT_PATH)?)?)?;
    let items = check_manifest(&content, parts)?;
    check_pictures(&parse_xml(SECTION_PATH, section)?, &items)?;

    for part in parts {
        if part.media_type.ends_with("xml") {
            parse_xml(&part.path, utf8(part)?)?;
        }
    }
    Ok(())
}

/// Every manifest item must be a part, and every binary part an item.
/// Returns the item ids.
fn check_manifest<'a>(
    content: &'a Document,
    parts: &[PackagePart],
) -> Result<HashSet<&'a str>, ConversionError> {
    let mut ids = HashSet::new();
    let mut hrefs = HashSet::new();
    for item in content
        .descendants()
        .filter(|node| node.tag_name().name() == "item")
    {
        let (Some(id), Some(href)) = (item.attribute("id"), item.attribute("href")) else {
            return Err(ConversionError::invariant("manifest item without id or href"));
        };
        if !parts.iter().any(|part| part.path == href) {
            return Err(ConversionError::invariant(format!(
                "manifest item {id} points at missing part {href}"
            )));
        }
        ids.insert(id);
        hrefs.insert(href);
    }
    if let Some(orphan) = parts
        .iter()
        .find(|part| part.path.starts_with("BinData/") && !hrefs.contains(part.path.as_str()))
    {
        return Err(ConversionError::invariant(format!(
            "{} is not listed in the manifest",
            orphan.path
        )));
    }
    Ok(ids)
}

fn check_pictures(section: &Document, items: &HashSet<&str>) -> Result<(), ConversionError> {
    for node in section
        .descendants()
        .filter(|node| node.has_attribute("binaryItemIDRef"))
    {
        let target = node.attribute("binaryItemIDRef").unwrap_or_default();
        if !items.contains(target) {
            return Err(ConversionError::invariant(format!(
                "picture refers to unknown binary item {target}"
            )));
        }
    }
    Ok(())
}

/// Cross-check a header and section pair.
pub fn verify_xml(header: &str, section: &str) -> Result<(), ConversionError> {
    let header = parse_xml(HEADER_PATH, header)?;
    let section = parse_xml(SECTION_PATH, section)?;

    let definitions = collect_definitions(&header)?;
    check_item_counts(&header)?;
    check_header_references(&header, &definitions)?;
    check_section(&section, &definitions)
}

fn utf8(part: &PackagePart) -> Result<&str, ConversionError> {
    std::str::from_utf8(&part.payload)
        .map_err(|err| ConversionError::invariant(format!("{} is not UTF-8: {err}", part.path)))
}

fn parse_xml<'a>(path: &str, text: &'a str) -> Result<Document<'a>, ConversionError> {
    Document::parse(text)
        .map_err(|err| ConversionError::invariant(format!("{path} is not well-formed: {err}")))
}

fn number(node: Node, attr: &str) -> Result<i64, ConversionError> {
    node.attribute(attr)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| {
            ConversionError::invariant(format!(
                "<{}> has no numeric {attr} attribute",
                node.tag_name().name()
            ))
        })
}

fn id(node: Node, attr: &str) -> Result<u32, ConversionError> {
    let value = number(node, attr)?;
    u32::try_from(value).map_err(|_| {
        ConversionError::invariant(format!(
            "<{}> {attr}={value} is out of range",
            node.tag_name().name()
        ))
    })
}

fn collect_definitions(header: &Document) -> Result<Definitions, ConversionError> {
    let mut definitions = Definitions::default();

    for (kind, first) in DEFINED {
        let mut ids = Vec::new();
        for node in header
            .descendants()
            .filter(|node| node.tag_name().name() == kind)
        {
            ids.push(id(node, "id")?);
        }

        let unique: HashSet<u32> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return Err(ConversionError::invariant(format!("duplicate {kind} id")));
        }
        let expected: HashSet<u32> = (first..first + ids.len() as u32).collect();
        if unique != expected {
            return Err(ConversionError::invariant(format!(
                "{kind} ids are not dense from {first}"
            )));
        }
        definitions.ids.insert(kind, unique);
    }

    definitions.fonts_per_face = header
        .descendants()
        .find(|node| node.tag_name().name() == "fontface")
        .map(|face| face.children().filter(Node::is_element).count())
        .unwrap_or(0);

    Ok(definitions)
}

/// Every `itemCnt` / `fontCnt` must match the number of child elements.
fn check_item_counts(header: &Document) -> Result<(), ConversionError> {
    for node in header.descendants() {
        for attr in ["itemCnt", "fontCnt"] {
            if node.attribute(attr).is_none() {
                continue;
            }
            let declared = number(node, attr)?;
            let actual = node.children().filter(Node::is_element).count() as i64;
            if declared != actual {
                return Err(ConversionError::invariant(format!(
                    "<{}> declares {attr}={declared} but has {actual} children",
                    node.tag_name().name()
                )));
            }
        }
    }
    Ok(())
}

fn check_header_references(
    header: &Document,
    definitions: &Definitions,
) -> Result<(), ConversionError> {
    for node in header.descendants().filter(Node::is_element) {
        match node.tag_name().name() {
            "style" => {
                resolve(node, "paraPrIDRef", "paraPr", definitions)?;
                resolve(node, "charPrIDRef", "charPr", definitions)?;
                resolve(node, "nextStyleIDRef", "style", definitions)?;
            }
            "charPr" | "border" => resolve(node, "borderFillIDRef", "borderFill", definitions)?,
            "heading" if node.attribute("type") == Some("NUMBER") => {
                resolve(node, "idRef", "numbering", definitions)?;
                if number(node, "level")? > 6 {
                    return Err(ConversionError::invariant("list level above 6"));
                }
            }
            "fontRef" => {
                for attr in node.attributes() {
                    let face = attr.value().parse::<usize>().unwrap_or(usize::MAX);
                    if face >= definitions.fonts_per_face {
                        return Err(ConversionError::invariant(format!(
                            "fontRef {}={} has no font",
                            attr.name(),
                            attr.value()
                        )));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_section(section: &Document, definitions: &Definitions) -> Result<(), ConversionError> {
    let mut field_begins = HashSet::new();
    let mut field_ends = Vec::new();

    for node in section.descendants().filter(Node::is_element) {
        for (attr, kind) in REFERENCES {
            if node.attribute(attr).is_some() {
                resolve(node, attr, kind, definitions)?;
            }
        }

        match node.tag_name().name() {
            // 0 means the section has no outline numbering
            "secPr" if number(node, "outlineShapeIDRef")? != 0 => {
                resolve(node, "outlineShapeIDRef", "numbering", definitions)?
            }
            "tbl" => check_table(node)?,
            "fieldBegin" => {
                field_begins.insert(id(node, "id")?);
            }
            "fieldEnd" => field_ends.push(id(node, "beginIDRef")?),
            _ => {}
        }
    }

    if let Some(end) = field_ends.iter().find(|end| !field_begins.contains(end)) {
        return Err(ConversionError::invariant(format!(
            "fieldEnd refers to unknown field {end}"
        )));
    }
    if field_ends.len() != field_begins.len() {
        return Err(ConversionError::invariant("unbalanced hyperlink fields"));
    }
    Ok(())
}

fn check_table(table: Node) -> Result<(), ConversionError> {
    let rows: Vec<Node> = table
        .children()
        .filter(|node| node.tag_name().name() == "tr")
        .collect();
    let declared_rows = number(table, "rowCnt")?;
    let declared_cols = number(table, "colCnt")?;

    if rows.len() as i64 != declared_rows {
        return Err(ConversionError::invariant(format!(
            "table declares {declared_rows} rows but has {}",
            rows.len()
        )));
    }
    for row in rows {
        let cells = row
            .children()
            .filter(|node| node.tag_name().name() == "tc")
            .count() as i64;
        if cells != declared_cols {
            return Err(ConversionError::invariant(format!(
                "table row has {cells} cells, expected {declared_cols}"
            )));
        }
    }
    Ok(())
}

fn resolve(
    node: Node,
    attr: &str,
    kind: &'static str,
    definitions: &Definitions,
) -> Result<(), ConversionError> {
    let value = id(node, attr)?;
    if definitions.has(kind, value) {
        Ok(())
    } else {
        Err(ConversionError::invariant(format!(
            "<{}> {attr}={value} does not resolve to a {kind}",
            node.tag_name().name()
        )))
    }
}
