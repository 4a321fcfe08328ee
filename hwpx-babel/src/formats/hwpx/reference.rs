//! Layout taken from a reference HWPX document.
//!
//! A user can hand over an existing `.hwpx` whose page setup and fonts the
//! output should follow. Only its bytes come in here; reading the file is the
//! caller's job. The page setup is the first `hp:pagePr` of the section, and
//! fonts are the Hangul faces of the normal style (`Normal`, 바탕글) and of
//! the first outline style (`Outline 1`, 개요 1). Anything the reference does
//! not define keeps its configured value.

use std::io::{Cursor, Read};

use roxmltree::{Document, Node};
use zip::ZipArchive;

use crate::error::ConversionError;
use crate::options::{LayoutOptions, PageMargins, PageSetup};

use super::{HEADER_PATH, SECTION_PATH};

/// Largest header or section read from a reference document.
const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDocument {
    pub page: Option<PageSetup>,
    pub body_font: Option<String>,
    pub heading_font: Option<String>,
}

impl ReferenceDocument {
    /// Read a reference package. It must be a zip with a header and a
    /// first section.
    pub fn read(bytes: &[u8]) -> Result<Self, ConversionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|err| reference_error(format!("not an HWPX package: {err}")))?;
        let header = read_part(&mut archive, HEADER_PATH)?;
        let section = read_part(&mut archive, SECTION_PATH)?;
        let header = parse(HEADER_PATH, &header)?;
        let section = parse(SECTION_PATH, &section)?;

        let reference = ReferenceDocument {
            page: page_setup(&section),
            body_font: style_font(&header, "Normal"),
            heading_font: style_font(&header, "Outline 1"),
        };
        log::debug!("reference document: {reference:?}");
        Ok(reference)
    }

    /// Override `layout` with whatever the reference defines.
    pub fn apply(&self, layout: &mut LayoutOptions) {
        if let Some(page) = &self.page {
            layout.page = page.clone();
        }
        if let Some(face) = &self.body_font {
            layout.fonts.body = face.clone();
        }
        if let Some(face) = &self.heading_font {
            layout.fonts.heading = face.clone();
        }
    }
}

fn reference_error(msg: String) -> ConversionError {
    ConversionError::Input(format!("reference document: {msg}"))
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<String, ConversionError> {
    let entry = archive
        .by_name(path)
        .map_err(|_| reference_error(format!("missing {path}")))?;
    let mut text = String::new();
    entry
        .take(MAX_PART_BYTES)
        .read_to_string(&mut text)
        .map_err(|err| reference_error(format!("reading {path}: {err}")))?;
    Ok(text)
}

fn parse<'a>(path: &str, text: &'a str) -> Result<Document<'a>, ConversionError> {
    Document::parse(text).map_err(|err| reference_error(format!("{path} is not well-formed: {err}")))
}

fn element<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    let name = name.to_string();
    parent
        .descendants()
        .filter(move |node| node.tag_name().name() == name)
}

fn number(node: Node, attr: &str) -> Option<u32> {
    node.attribute(attr)?.parse().ok()
}

fn page_setup(section: &Document) -> Option<PageSetup> {
    let page = element(section.root(), "pagePr").next()?;
    let (Some(width), Some(height)) = (number(page, "width"), number(page, "height")) else {
        log::warn!("reference page setup has no size, keeping the configured page");
        return None;
    };

    let defaults = PageSetup::default();
    let margins = match element(page, "margin").next() {
        Some(margin) => {
            let fallback = PageMargins::default();
            let side = |attr: &str, default: u32| number(margin, attr).unwrap_or(default);
            PageMargins {
                left: side("left", fallback.left),
                right: side("right", fallback.right),
                top: side("top", fallback.top),
                bottom: side("bottom", fallback.bottom),
                header: side("header", fallback.header),
                footer: side("footer", fallback.footer),
                gutter: side("gutter", fallback.gutter),
            }
        }
        None => defaults.margins,
    };

    Some(PageSetup {
        width,
        height,
        orientation: page
            .attribute("landscape")
            .map_or(defaults.orientation, str::to_string),
        gutter_type: page
            .attribute("gutterType")
            .map_or(defaults.gutter_type, str::to_string),
        margins,
    })
}

/// Hangul face used by the style whose English name is `eng_name`.
fn style_font(header: &Document, eng_name: &str) -> Option<String> {
    let root = header.root();
    let style = element(root, "style").find(|node| node.attribute("engName") == Some(eng_name))?;
    let char_pr_id = style.attribute("charPrIDRef")?;
    let char_pr = element(root, "charPr").find(|node| node.attribute("id") == Some(char_pr_id))?;
    let font_id = element(char_pr, "fontRef").next()?.attribute("hangul")?;

    let hangul = element(root, "fontface").find(|node| {
        node.attribute("lang")
            .is_some_and(|lang| lang.eq_ignore_ascii_case("hangul"))
    })?;
    element(hangul, "font")
        .find(|node| node.attribute("id") == Some(font_id))?
        .attribute("face")
        .map(str::to_string)
}
