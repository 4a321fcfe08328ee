//! `Contents/header.xml`: fonts, borders and every property the section
//! references, rendered from a finished [`StyleCatalog`].

use crate::error::ConversionError;
use crate::ir::nodes::{ListKind, StyleRef};
use crate::options::LayoutOptions;

use super::catalog::{CharShape, FontFace, Numbering, ParaShape, StyleCatalog};
use super::xml::XmlWriter;
use super::{NS_APP, NS_CORE, NS_HEAD, NS_PARAGRAPH};

/// Border fill without any visible border, used by text.
pub(crate) const PLAIN_BORDER_FILL: u32 = 1;
/// Thin solid border used by table cells.
pub(crate) const TABLE_BORDER_FILL: u32 = 2;

const LANGUAGES: [&str; 7] = [
    "HANGUL", "LATIN", "HANJA", "JAPANESE", "OTHER", "SYMBOL", "USER",
];
const LANG_ATTRS: [&str; 7] = [
    "hangul", "latin", "hanja", "japanese", "other", "symbol", "user",
];

const LIST_LEVELS: usize = 7;
const ORDERED_FORMATS: [&str; 3] = ["DIGIT", "LATIN_CAPITAL", "ROMAN_SMALL"];
const BULLET_CHARS: [&str; LIST_LEVELS] = ["ㅇ", "-", "∙", "●", "○", "■", "●"];

pub(crate) fn write_header(
    catalog: &StyleCatalog,
    layout: &LayoutOptions,
) -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("hh:head")
        .attr("xmlns:ha", NS_APP)
        .attr("xmlns:hp", NS_PARAGRAPH)
        .attr("xmlns:hh", NS_HEAD)
        .attr("xmlns:hc", NS_CORE)
        .attr("version", "1.4")
        .attr("secCnt", 1)
        .open()?;
    xml.element("hh:beginNum")
        .attr("page", 1)
        .attr("footnote", 1)
        .attr("endnote", 1)
        .attr("pic", 1)
        .attr("tbl", 1)
        .attr("equation", 1)
        .empty()?;

    xml.element("hh:refList").open()?;
    font_faces(&mut xml, layout)?;
    border_fills(&mut xml)?;

    xml.element("hh:charProperties")
        .attr("itemCnt", catalog.char_shapes().len())
        .open()?;
    for (id, shape) in catalog.char_shapes().iter().enumerate() {
        char_pr(&mut xml, id, shape, layout)?;
    }
    xml.close("hh:charProperties")?;

    xml.element("hh:tabProperties").attr("itemCnt", 1).open()?;
    xml.element("hh:tabPr")
        .attr("id", 0)
        .attr("autoTabLeft", 0)
        .attr("autoTabRight", 0)
        .empty()?;
    xml.close("hh:tabProperties")?;

    xml.element("hh:numberings")
        .attr("itemCnt", catalog.numberings().len())
        .open()?;
    for numbering in catalog.numberings() {
        write_numbering(&mut xml, numbering)?;
    }
    xml.close("hh:numberings")?;

    xml.element("hh:paraProperties")
        .attr("itemCnt", catalog.para_shapes().len())
        .open()?;
    for (id, shape) in catalog.para_shapes().iter().enumerate() {
        para_pr(&mut xml, id, shape, layout)?;
    }
    xml.close("hh:paraProperties")?;

    styles(&mut xml, catalog)?;
    xml.close("hh:refList")?;

    xml.element("hh:compatibleDocument")
        .attr("targetProgram", "HWP201X")
        .open()?;
    xml.element("hh:layoutCompatibility").empty()?;
    xml.close("hh:compatibleDocument")?;
    xml.element("hh:docOption").open()?;
    xml.element("hh:linkinfo")
        .attr("path", "")
        .attr("pageInherit", 0)
        .attr("footnoteInherit", 0)
        .empty()?;
    xml.close("hh:docOption")?;

    xml.close("hh:head")?;
    Ok(xml.finish())
}

fn font_faces(xml: &mut XmlWriter, layout: &LayoutOptions) -> Result<(), ConversionError> {
    let faces = [
        (FontFace::Body, layout.fonts.body.as_str()),
        (FontFace::Heading, layout.fonts.heading.as_str()),
        (FontFace::Code, layout.fonts.code.as_str()),
    ];

    xml.element("hh:fontfaces")
        .attr("itemCnt", LANGUAGES.len())
        .open()?;
    for lang in LANGUAGES {
        xml.element("hh:fontface")
            .attr("lang", lang)
            .attr("fontCnt", faces.len())
            .open()?;
        for (face, name) in faces {
            xml.element("hh:font")
                .attr("id", face.id())
                .attr("face", name)
                .attr("type", "TTF")
                .attr("isEmbedded", 0)
                .empty()?;
        }
        xml.close("hh:fontface")?;
    }
    xml.close("hh:fontfaces")
}

fn border_fills(xml: &mut XmlWriter) -> Result<(), ConversionError> {
    xml.element("hh:borderFills").attr("itemCnt", 2).open()?;
    for (id, kind, width) in [
        (PLAIN_BORDER_FILL, "NONE", "0.1 mm"),
        (TABLE_BORDER_FILL, "SOLID", "0.12 mm"),
    ] {
        xml.element("hh:borderFill")
            .attr("id", id)
            .attr("threeD", 0)
            .attr("shadow", 0)
            .attr("centerLine", "NONE")
            .attr("breakCellSeparateLine", 0)
            .open()?;
        for name in ["hh:slash", "hh:backSlash"] {
            xml.element(name)
                .attr("type", "NONE")
                .attr("Crooked", 0)
                .attr("isCounter", 0)
                .empty()?;
        }
        for name in [
            "hh:leftBorder",
            "hh:rightBorder",
            "hh:topBorder",
            "hh:bottomBorder",
        ] {
            xml.element(name)
                .attr("type", kind)
                .attr("width", width)
                .attr("color", "#000000")
                .empty()?;
        }
        xml.element("hh:diagonal")
            .attr("type", "SOLID")
            .attr("width", "0.1 mm")
            .attr("color", "#000000")
            .empty()?;
        xml.close("hh:borderFill")?;
    }
    xml.close("hh:borderFills")
}

/// An element with the same value on every per-language attribute.
fn per_language(xml: &mut XmlWriter, name: &str, value: u32) -> Result<(), ConversionError> {
    LANG_ATTRS
        .iter()
        .fold(xml.element(name), |element, lang| element.attr(lang, value))
        .empty()
}

fn char_pr(
    xml: &mut XmlWriter,
    id: usize,
    shape: &CharShape,
    layout: &LayoutOptions,
) -> Result<(), ConversionError> {
    let color = if shape.link {
        layout.link_color.as_str()
    } else {
        "#000000"
    };

    xml.element("hh:charPr")
        .attr("id", id)
        .attr("height", shape.height())
        .attr("textColor", color)
        .attr("shadeColor", "none")
        .attr("useFontSpace", 0)
        .attr("useKerning", 0)
        .attr("symMark", "NONE")
        .attr("borderFillIDRef", PLAIN_BORDER_FILL)
        .open()?;
    per_language(xml, "hh:fontRef", shape.face().id())?;
    per_language(xml, "hh:ratio", 100)?;
    per_language(xml, "hh:spacing", 0)?;
    per_language(xml, "hh:relSz", 100)?;
    per_language(xml, "hh:offset", 0)?;
    if shape.bold {
        xml.element("hh:bold").empty()?;
    }
    if shape.italic {
        xml.element("hh:italic").empty()?;
    }
    xml.element("hh:underline")
        .attr("type", if shape.link { "BOTTOM" } else { "NONE" })
        .attr("shape", "SOLID")
        .attr("color", color)
        .empty()?;
    xml.element("hh:strikeout")
        .attr("shape", if shape.strike { "SOLID" } else { "NONE" })
        .attr("color", "#000000")
        .empty()?;
    xml.element("hh:outline").attr("type", "NONE").empty()?;
    xml.element("hh:shadow")
        .attr("type", "NONE")
        .attr("color", "#B2B2B2")
        .attr("offsetX", 10)
        .attr("offsetY", 10)
        .empty()?;
    xml.close("hh:charPr")
}

fn write_numbering(xml: &mut XmlWriter, numbering: &Numbering) -> Result<(), ConversionError> {
    xml.element("hh:numbering")
        .attr("id", numbering.id)
        .attr("start", numbering.start())
        .open()?;
    for level in 0..LIST_LEVELS {
        let (format, text) = match numbering.kind {
            ListKind::Ordered { .. } => (
                ORDERED_FORMATS[level % ORDERED_FORMATS.len()],
                format!("^{}.", level + 1),
            ),
            ListKind::Bullet => ("DIGIT", BULLET_CHARS[level].to_string()),
        };
        xml.element("hh:paraHead")
            .attr("start", 1)
            .attr("level", level + 1)
            .attr("align", "LEFT")
            .attr("useInstWidth", 1)
            .attr("autoIndent", 0)
            .attr("widthAdjust", 0)
            .attr("textOffsetType", "PERCENT")
            .attr("textOffset", 50)
            .attr("numFormat", format)
            .attr("charPrIDRef", u32::MAX)
            .attr("checkable", 0)
            .text(&text)?;
    }
    xml.close("hh:numbering")
}

fn para_pr(
    xml: &mut XmlWriter,
    id: usize,
    shape: &ParaShape,
    layout: &LayoutOptions,
) -> Result<(), ConversionError> {
    let list_indent = i64::from(layout.list_indent);
    let mut left = i64::from(shape.quote_level) * i64::from(layout.quote_indent);
    let mut intent = 0;
    if let Some(list) = shape.list {
        left += (i64::from(list.level) + 1) * list_indent;
        if list.numbering.is_some() {
            intent = -list_indent;
        }
    }
    let (prev, next) = shape.spacing();

    xml.element("hh:paraPr")
        .attr("id", id)
        .attr("tabPrIDRef", 0)
        .attr("condense", 0)
        .attr("fontLineHeight", 0)
        .attr("snapToGrid", 1)
        .attr("suppressLineNumbers", 0)
        .attr("checked", 0)
        .open()?;
    xml.element("hh:align")
        .attr("horizontal", shape.align.as_hwpx())
        .attr("vertical", "BASELINE")
        .empty()?;

    match shape.list.and_then(|list| list.numbering.map(|id| (id, list.level))) {
        Some((numbering, level)) => xml
            .element("hh:heading")
            .attr("type", "NUMBER")
            .attr("idRef", numbering)
            .attr("level", level)
            .empty()?,
        None => xml
            .element("hh:heading")
            .attr("type", "NONE")
            .attr("idRef", 0)
            .attr("level", 0)
            .empty()?,
    }

    xml.element("hh:breakSetting")
        .attr("breakLatinWord", "KEEP_WORD")
        .attr("breakNonLatinWord", "KEEP_WORD")
        .attr("widowOrphan", 0)
        .attr("keepWithNext", u8::from(shape.keep_with_next()))
        .attr("keepLines", 0)
        .attr("pageBreakBefore", 0)
        .attr("lineWrap", "BREAK")
        .empty()?;
    xml.element("hh:autoSpacing")
        .attr("eAsianEng", 0)
        .attr("eAsianNum", 0)
        .empty()?;

    xml.element("hh:margin").open()?;
    for (name, value) in [
        ("hc:intent", intent),
        ("hc:left", left),
        ("hc:right", 0),
        ("hc:prev", i64::from(prev)),
        ("hc:next", i64::from(next)),
    ] {
        xml.element(name)
            .attr("value", value)
            .attr("unit", "HWPUNIT")
            .empty()?;
    }
    xml.close("hh:margin")?;

    xml.element("hh:lineSpacing")
        .attr("type", "PERCENT")
        .attr("value", shape.line_spacing())
        .attr("unit", "HWPUNIT")
        .empty()?;
    xml.element("hh:border")
        .attr("borderFillIDRef", PLAIN_BORDER_FILL)
        .attr("offsetLeft", 0)
        .attr("offsetRight", 0)
        .attr("offsetTop", 0)
        .attr("offsetBottom", 0)
        .attr("connect", 0)
        .attr("ignoreMargin", 0)
        .empty()?;
    xml.close("hh:paraPr")
}

fn style_names(style: StyleRef) -> (&'static str, &'static str) {
    match style {
        StyleRef::BodyText => ("바탕글", "Normal"),
        StyleRef::Title => ("제목", "Title"),
        StyleRef::Heading1 => ("개요 1", "Outline 1"),
        StyleRef::Heading2 => ("개요 2", "Outline 2"),
        StyleRef::Heading3 => ("개요 3", "Outline 3"),
        StyleRef::Heading4 => ("개요 4", "Outline 4"),
        StyleRef::Heading5 => ("개요 5", "Outline 5"),
        StyleRef::Heading6 => ("개요 6", "Outline 6"),
        StyleRef::ListText => ("목록", "List"),
        StyleRef::CodeText => ("코드", "Code"),
        StyleRef::TableCell => ("표 내용", "Table Cell"),
    }
}

fn styles(xml: &mut XmlWriter, catalog: &StyleCatalog) -> Result<(), ConversionError> {
    xml.element("hh:styles")
        .attr("itemCnt", StyleRef::ALL.len())
        .open()?;
    for style in StyleRef::ALL {
        let (name, eng_name) = style_names(style);
        // headings and the title hand over to body text on Enter
        let next = if style == StyleRef::Title || style.heading_level().is_some() {
            StyleRef::BodyText
        } else {
            style
        };
        let id = catalog.style_id(style);
        xml.element("hh:style")
            .attr("id", id)
            .attr("type", "PARA")
            .attr("name", name)
            .attr("engName", eng_name)
            .attr("paraPrIDRef", id)
            .attr("charPrIDRef", catalog.base_char_pr(style))
            .attr("nextStyleIDRef", catalog.style_id(next))
            .attr("langID", 1042)
            .attr("lockForm", 0)
            .empty()?;
    }
    xml.close("hh:styles")
}
