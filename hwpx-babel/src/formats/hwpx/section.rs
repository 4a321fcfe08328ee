//! `Contents/section0.xml`: the body text.
//!
//! One `hp:p` per model block, in model order. Formatting is resolved through
//! the [`StyleCatalog`] as paragraphs are written, so the catalog is complete
//! once the section is done and the header can be rendered from it.

use crate::common::table::column_widths;
use crate::error::ConversionError;
use crate::ir::nodes::{
    Block, BlockKind, DocumentModel, ImageRun, Run, RunFormat, StyleRef, Table, TextRun,
};
use crate::options::LayoutOptions;

use super::catalog::{ListIndent, ParaAlign, StyleCatalog};
use super::xml::XmlWriter;
use super::{NS_APP, NS_CORE, NS_HEAD, NS_PARAGRAPH, NS_SECTION};

/// Deepest list level HWPX paragraph headings address.
const MAX_LIST_LEVEL: usize = 6;

const ROW_HEIGHT: u32 = 1000;

/// Sequential ids for paragraphs, drawing objects and fields.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    paragraph: u32,
    object: u32,
    field: u32,
}

impl IdAllocator {
    fn paragraph(&mut self) -> u32 {
        bump(&mut self.paragraph)
    }

    fn object(&mut self) -> u32 {
        bump(&mut self.object)
    }

    fn field(&mut self) -> u32 {
        bump(&mut self.field)
    }
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

/// Write the section part, registering every shape it uses in `catalog`.
pub(crate) fn write_section(
    model: &DocumentModel,
    catalog: &mut StyleCatalog,
    layout: &LayoutOptions,
) -> Result<Vec<u8>, ConversionError> {
    let mut xml = XmlWriter::new()?;
    xml.element("hs:sec")
        .attr("xmlns:ha", NS_APP)
        .attr("xmlns:hp", NS_PARAGRAPH)
        .attr("xmlns:hs", NS_SECTION)
        .attr("xmlns:hc", NS_CORE)
        .attr("xmlns:hh", NS_HEAD)
        .open()?;

    let mut writer = SectionWriter {
        xml,
        catalog,
        layout,
        ids: IdAllocator::default(),
        needs_section_properties: true,
    };
    for block in &model.blocks {
        writer.block(block)?;
    }

    let mut xml = writer.xml;
    xml.close("hs:sec")?;
    Ok(xml.finish())
}

struct SectionWriter<'a> {
    xml: XmlWriter,
    catalog: &'a mut StyleCatalog,
    layout: &'a LayoutOptions,
    ids: IdAllocator,
    needs_section_properties: bool,
}

impl SectionWriter<'_> {
    fn block(&mut self, block: &Block) -> Result<(), ConversionError> {
        match &block.kind {
            BlockKind::Heading { runs, .. } | BlockKind::Paragraph { runs } => {
                let para_pr = self
                    .catalog
                    .para_pr(block.style, None, block.quote_level, None);
                self.paragraph(block.style, para_pr, block.page_break_before, runs, false)
            }
            BlockKind::ListItem { marker, runs } => {
                let numbering = marker.map(|m| self.catalog.numbering(m.list_id, m.kind));
                let indent = ListIndent {
                    numbering,
                    level: block.depth.min(MAX_LIST_LEVEL) as u8,
                };
                let para_pr =
                    self.catalog
                        .para_pr(block.style, Some(indent), block.quote_level, None);
                self.paragraph(block.style, para_pr, block.page_break_before, runs, false)
            }
            BlockKind::Code { lines, .. } => {
                let mut runs = Vec::with_capacity(lines.len() * 2);
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        runs.push(Run::LineBreak);
                    }
                    if !line.is_empty() {
                        runs.push(Run::text(line.as_str(), RunFormat::plain()));
                    }
                }
                let para_pr = self
                    .catalog
                    .para_pr(block.style, None, block.quote_level, None);
                self.paragraph(block.style, para_pr, block.page_break_before, &runs, false)
            }
            BlockKind::Table(table) => self.table(block, table),
            BlockKind::Rule => {
                let para_pr = self
                    .catalog
                    .para_pr(block.style, None, block.quote_level, None);
                self.paragraph(block.style, para_pr, block.page_break_before, &[], false)
            }
        }
    }

    fn paragraph(
        &mut self,
        style: StyleRef,
        para_pr: u32,
        page_break: bool,
        runs: &[Run],
        bold: bool,
    ) -> Result<(), ConversionError> {
        self.open_paragraph(style, para_pr, page_break)?;
        self.runs(style, runs, bold)?;
        self.xml.close("hp:p")
    }

    fn open_paragraph(
        &mut self,
        style: StyleRef,
        para_pr: u32,
        page_break: bool,
    ) -> Result<(), ConversionError> {
        let id = self.ids.paragraph();
        self.xml
            .element("hp:p")
            .attr("id", id)
            .attr("paraPrIDRef", para_pr)
            .attr("styleIDRef", self.catalog.style_id(style))
            .attr("pageBreak", u8::from(page_break))
            .attr("columnBreak", 0)
            .attr("merged", 0)
            .open()?;

        if std::mem::take(&mut self.needs_section_properties) {
            self.section_properties(style)?;
        }
        Ok(())
    }

    /// Page setup and column definition, carried by the first paragraph.
    fn section_properties(&mut self, style: StyleRef) -> Result<(), ConversionError> {
        let page = &self.layout.page;
        let margins = page.margins;
        let xml = &mut self.xml;
        xml.element("hp:run")
            .attr("charPrIDRef", self.catalog.base_char_pr(style))
            .open()?;

        xml.element("hp:secPr")
            .attr("id", "")
            .attr("textDirection", "HORIZONTAL")
            .attr("spaceColumns", 1134)
            .attr("tabStop", 8000)
            .attr("tabStopVal", 4000)
            .attr("tabStopUnit", "HWPUNIT")
            .attr("outlineShapeIDRef", 0)
            .attr("memoShapeIDRef", 0)
            .attr("textVerticalWidthHead", 0)
            .attr("masterPageCnt", 0)
            .open()?;
        xml.element("hp:grid")
            .attr("lineGrid", 0)
            .attr("charGrid", 0)
            .attr("wonggojiFormat", 0)
            .empty()?;
        xml.element("hp:startNum")
            .attr("pageStartsOn", "BOTH")
            .attr("page", 0)
            .attr("pic", 0)
            .attr("tbl", 0)
            .attr("equation", 0)
            .empty()?;
        xml.element("hp:visibility")
            .attr("hideFirstHeader", 0)
            .attr("hideFirstFooter", 0)
            .attr("hideFirstMasterPage", 0)
            .attr("border", "SHOW_ALL")
            .attr("fill", "SHOW_ALL")
            .attr("hideFirstPageNum", 0)
            .attr("hideFirstEmptyLine", 0)
            .attr("showLineNumber", 0)
            .empty()?;
        xml.element("hp:pagePr")
            .attr("landscape", &page.orientation)
            .attr("width", page.width)
            .attr("height", page.height)
            .attr("gutterType", &page.gutter_type)
            .open()?;
        xml.element("hp:margin")
            .attr("header", margins.header)
            .attr("footer", margins.footer)
            .attr("gutter", margins.gutter)
            .attr("left", margins.left)
            .attr("right", margins.right)
            .attr("top", margins.top)
            .attr("bottom", margins.bottom)
            .empty()?;
        xml.close("hp:pagePr")?;
        xml.close("hp:secPr")?;

        xml.element("hp:ctrl").open()?;
        xml.element("hp:colPr")
            .attr("id", "")
            .attr("type", "NEWSPAPER")
            .attr("layout", "LEFT")
            .attr("colCount", 1)
            .attr("sameSz", 1)
            .attr("sameGap", 0)
            .empty()?;
        xml.close("hp:ctrl")?;
        xml.close("hp:run")
    }

    fn runs(&mut self, style: StyleRef, runs: &[Run], bold: bool) -> Result<(), ConversionError> {
        if runs.is_empty() {
            return self
                .xml
                .element("hp:run")
                .attr("charPrIDRef", self.catalog.base_char_pr(style))
                .empty();
        }

        // (href, field id) of the hyperlink field currently open
        let mut open_field: Option<(&str, u32)> = None;
        let mut last_char_pr = self.catalog.base_char_pr(style);

        for run in runs {
            match run {
                Run::LineBreak => {
                    self.xml
                        .element("hp:run")
                        .attr("charPrIDRef", last_char_pr)
                        .open()?;
                    self.xml.element("hp:t").open()?;
                    self.xml.element("hp:lineBreak").empty()?;
                    self.xml.close("hp:t")?;
                    self.xml.close("hp:run")?;
                }
                Run::Image(image) => {
                    if let Some((_, field)) = open_field.take() {
                        self.field_end(last_char_pr, field)?;
                    }
                    self.picture(last_char_pr, image)?;
                }
                Run::Text(text) => {
                    let char_pr = self.char_pr(style, text, bold);
                    let target = text.link.as_deref().filter(|href| is_external(href));

                    if open_field.map(|(href, _)| href) != target {
                        if let Some((_, field)) = open_field.take() {
                            self.field_end(last_char_pr, field)?;
                        }
                        if let Some(href) = target {
                            let field = self.ids.field();
                            self.field_begin(char_pr, field, href)?;
                            open_field = Some((href, field));
                        }
                    }

                    self.xml
                        .element("hp:run")
                        .attr("charPrIDRef", char_pr)
                        .open()?;
                    self.xml.element("hp:t").text(&text.text)?;
                    self.xml.close("hp:run")?;
                    last_char_pr = char_pr;
                }
            }
        }

        if let Some((_, field)) = open_field {
            self.field_end(last_char_pr, field)?;
        }
        Ok(())
    }

    fn char_pr(&mut self, style: StyleRef, text: &TextRun, bold: bool) -> u32 {
        let format = if bold {
            text.format.with_bold()
        } else {
            text.format
        };
        self.catalog.char_pr(style, format, text.link.is_some())
    }

    /// An inline picture (`hp:pic` treated as a character) pointing at its
    /// binary item.
    fn picture(&mut self, char_pr: u32, image: &ImageRun) -> Result<(), ConversionError> {
        let id = self.ids.object();
        let (width, height) = (image.width, image.height);
        let xml = &mut self.xml;

        xml.element("hp:run").attr("charPrIDRef", char_pr).open()?;
        xml.element("hp:pic")
            .attr("id", id)
            .attr("zOrder", 0)
            .attr("numberingType", "PICTURE")
            .attr("textWrap", "TOP_AND_BOTTOM")
            .attr("textFlow", "BOTH_SIDES")
            .attr("lock", 0)
            .attr("dropcapstyle", "None")
            .attr("href", "")
            .attr("groupLevel", 0)
            .attr("instid", id)
            .attr("reverse", 0)
            .open()?;
        xml.element("hp:offset").attr("x", 0).attr("y", 0).empty()?;
        for name in ["hp:orgSz", "hp:curSz"] {
            xml.element(name)
                .attr("width", width)
                .attr("height", height)
                .empty()?;
        }
        xml.element("hp:flip")
            .attr("horizontal", 0)
            .attr("vertical", 0)
            .empty()?;
        xml.element("hp:rotationInfo")
            .attr("angle", 0)
            .attr("centerX", width / 2)
            .attr("centerY", height / 2)
            .attr("rotateimage", 1)
            .empty()?;
        xml.element("hp:renderingInfo").open()?;
        for name in ["hc:transMatrix", "hc:scaMatrix", "hc:rotMatrix"] {
            xml.element(name)
                .attr("e1", 1)
                .attr("e2", 0)
                .attr("e3", 0)
                .attr("e4", 0)
                .attr("e5", 1)
                .attr("e6", 0)
                .empty()?;
        }
        xml.close("hp:renderingInfo")?;
        xml.element("hc:img")
            .attr("binaryItemIDRef", &image.binary_id)
            .attr("bright", 0)
            .attr("contrast", 0)
            .attr("effect", "REAL_PIC")
            .attr("alpha", 0)
            .empty()?;
        xml.element("hp:imgRect").open()?;
        for (name, x, y) in [
            ("hc:pt0", 0, 0),
            ("hc:pt1", width, 0),
            ("hc:pt2", width, height),
            ("hc:pt3", 0, height),
        ] {
            xml.element(name).attr("x", x).attr("y", y).empty()?;
        }
        xml.close("hp:imgRect")?;
        for name in ["hp:imgClip", "hp:inMargin"] {
            xml.element(name)
                .attr("left", 0)
                .attr("right", 0)
                .attr("top", 0)
                .attr("bottom", 0)
                .empty()?;
        }
        xml.element("hp:imgDim")
            .attr("dimwidth", 0)
            .attr("dimheight", 0)
            .empty()?;
        xml.element("hp:effects").empty()?;
        xml.element("hp:sz")
            .attr("width", width)
            .attr("widthRelTo", "ABSOLUTE")
            .attr("height", height)
            .attr("heightRelTo", "ABSOLUTE")
            .attr("protect", 0)
            .empty()?;
        xml.element("hp:pos")
            .attr("treatAsChar", 1)
            .attr("affectLSpacing", 0)
            .attr("flowWithText", 1)
            .attr("allowOverlap", 1)
            .attr("holdAnchorAndSO", 0)
            .attr("vertRelTo", "PARA")
            .attr("horzRelTo", "COLUMN")
            .attr("vertAlign", "TOP")
            .attr("horzAlign", "LEFT")
            .attr("vertOffset", 0)
            .attr("horzOffset", 0)
            .empty()?;
        xml.element("hp:outMargin")
            .attr("left", 0)
            .attr("right", 0)
            .attr("top", 0)
            .attr("bottom", 0)
            .empty()?;
        xml.element("hp:shapeComment").text(&image.alt)?;
        xml.close("hp:pic")?;
        xml.close("hp:run")
    }

    fn field_begin(&mut self, char_pr: u32, field: u32, href: &str) -> Result<(), ConversionError> {
        let command = format!("{};1;5;-1;", href.replace(':', "\\:").replace('?', "\\?"));
        let xml = &mut self.xml;

        xml.element("hp:run").attr("charPrIDRef", char_pr).open()?;
        xml.element("hp:ctrl").open()?;
        xml.element("hp:fieldBegin")
            .attr("id", field)
            .attr("type", "HYPERLINK")
            .attr("name", "")
            .attr("editable", 0)
            .attr("dirty", 1)
            .attr("zorder", -1)
            .attr("fieldid", field)
            .attr("metaTag", "")
            .open()?;
        xml.element("hp:parameters")
            .attr("cnt", 6)
            .attr("name", "")
            .open()?;
        xml.element("hp:integerParam").attr("name", "Prop").text("0")?;
        xml.element("hp:stringParam")
            .attr("name", "Command")
            .text(&command)?;
        xml.element("hp:stringParam").attr("name", "Path").text(href)?;
        xml.element("hp:stringParam")
            .attr("name", "Category")
            .text("HWPHYPERLINK_TYPE_URL")?;
        xml.element("hp:stringParam")
            .attr("name", "TargetType")
            .text("HWPHYPERLINK_TARGET_HYPERLINK")?;
        xml.element("hp:stringParam")
            .attr("name", "DocOpenType")
            .text("HWPHYPERLINK_JUMP_DONTCARE")?;
        xml.close("hp:parameters")?;
        xml.close("hp:fieldBegin")?;
        xml.close("hp:ctrl")?;
        xml.close("hp:run")
    }

    fn field_end(&mut self, char_pr: u32, field: u32) -> Result<(), ConversionError> {
        let xml = &mut self.xml;
        xml.element("hp:run").attr("charPrIDRef", char_pr).open()?;
        xml.element("hp:ctrl").open()?;
        xml.element("hp:fieldEnd")
            .attr("beginIDRef", field)
            .attr("fieldid", field)
            .empty()?;
        xml.close("hp:ctrl")?;
        xml.close("hp:run")
    }

    fn table(&mut self, block: &Block, table: &Table) -> Result<(), ConversionError> {
        for (i, row) in table.rows.iter().enumerate() {
            if row.cells.len() != table.columns {
                return Err(ConversionError::invariant(format!(
                    "table row {i} has {} cells, expected {}",
                    row.cells.len(),
                    table.columns
                )));
            }
        }

        let style = block.style;
        let para_pr = self.catalog.para_pr(style, None, block.quote_level, None);
        self.open_paragraph(style, para_pr, block.page_break_before)?;

        let total = self.layout.table_width;
        let widths = column_widths(total, table.columns, table.weights.as_deref());
        let rows = table.rows.len() as u32;
        let id = self.ids.object();

        self.xml
            .element("hp:run")
            .attr("charPrIDRef", self.catalog.base_char_pr(style))
            .open()?;
        self.xml
            .element("hp:tbl")
            .attr("id", id)
            .attr("zOrder", 0)
            .attr("numberingType", "TABLE")
            .attr("textWrap", "TOP_AND_BOTTOM")
            .attr("textFlow", "BOTH_SIDES")
            .attr("lock", 0)
            .attr("dropcapstyle", "None")
            .attr("pageBreak", "CELL")
            .attr("repeatHeader", 1)
            .attr("rowCnt", rows)
            .attr("colCnt", table.columns)
            .attr("cellSpacing", 0)
            .attr("borderFillIDRef", super::header::TABLE_BORDER_FILL)
            .attr("noAdjust", 0)
            .open()?;
        self.xml
            .element("hp:sz")
            .attr("width", total)
            .attr("widthRelTo", "ABSOLUTE")
            .attr("height", rows * ROW_HEIGHT)
            .attr("heightRelTo", "ABSOLUTE")
            .attr("protect", 0)
            .empty()?;
        self.xml
            .element("hp:pos")
            .attr("treatAsChar", 0)
            .attr("affectLSpacing", 0)
            .attr("flowWithText", 1)
            .attr("allowOverlap", 0)
            .attr("holdAnchorAndSO", 0)
            .attr("vertRelTo", "PARA")
            .attr("horzRelTo", "COLUMN")
            .attr("vertAlign", "TOP")
            .attr("horzAlign", "LEFT")
            .attr("vertOffset", 0)
            .attr("horzOffset", 0)
            .empty()?;
        self.xml
            .element("hp:outMargin")
            .attr("left", 0)
            .attr("right", 0)
            .attr("top", 0)
            .attr("bottom", 1417)
            .empty()?;
        self.cell_margin("hp:inMargin")?;

        for (row_addr, row) in table.rows.iter().enumerate() {
            self.xml.element("hp:tr").open()?;
            for (col_addr, cell) in row.cells.iter().enumerate() {
                let align = ParaAlign::for_cell(table.alignments[col_addr], row.header);
                let cell_para_pr = self.catalog.para_pr(style, None, 0, Some(align));

                self.xml
                    .element("hp:tc")
                    .attr("name", "")
                    .attr("header", u8::from(row.header))
                    .attr("hasMargin", 0)
                    .attr("protect", 0)
                    .attr("editable", 0)
                    .attr("dirty", 0)
                    .attr("borderFillIDRef", super::header::TABLE_BORDER_FILL)
                    .open()?;
                self.xml
                    .element("hp:subList")
                    .attr("id", "")
                    .attr("textDirection", "HORIZONTAL")
                    .attr("lineWrap", "BREAK")
                    .attr("vertAlign", "CENTER")
                    .attr("linkListIDRef", 0)
                    .attr("linkListNextIDRef", 0)
                    .attr("textWidth", 0)
                    .attr("textHeight", 0)
                    .attr("hasTextRef", 0)
                    .attr("hasNumRef", 0)
                    .open()?;
                self.paragraph(style, cell_para_pr, false, cell, row.header)?;
                self.xml.close("hp:subList")?;

                self.xml
                    .element("hp:cellAddr")
                    .attr("colAddr", col_addr)
                    .attr("rowAddr", row_addr)
                    .empty()?;
                self.xml
                    .element("hp:cellSpan")
                    .attr("colSpan", 1)
                    .attr("rowSpan", 1)
                    .empty()?;
                self.xml
                    .element("hp:cellSz")
                    .attr("width", widths[col_addr])
                    .attr("height", ROW_HEIGHT)
                    .empty()?;
                self.cell_margin("hp:cellMargin")?;
                self.xml.close("hp:tc")?;
            }
            self.xml.close("hp:tr")?;
        }

        self.xml.close("hp:tbl")?;
        self.xml.element("hp:t").empty()?;
        self.xml.close("hp:run")?;
        self.xml.close("hp:p")
    }

    fn cell_margin(&mut self, name: &str) -> Result<(), ConversionError> {
        self.xml
            .element(name)
            .attr("left", 510)
            .attr("right", 510)
            .attr("top", 141)
            .attr("bottom", 141)
            .empty()
    }
}

/// Links with a scheme a viewer can open get a hyperlink field. Relative
/// references and fragments are only styled.
fn is_external(href: &str) -> bool {
    match url::Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto" | "ftp"),
        Err(_) => false,
    }
}
