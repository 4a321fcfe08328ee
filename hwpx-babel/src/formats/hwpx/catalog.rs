//! Registry of character, paragraph and numbering properties.
//!
//! HWPX paragraphs and runs never carry formatting inline: they point at
//! `hh:charPr` / `hh:paraPr` entries in the header by id. The catalog hands
//! out those ids. Each [`StyleRef`] has a baseline charPr and paraPr whose id
//! equals its position in [`StyleRef::ALL`]; formatting variants (bold inside
//! body text, a list level, a quoted paragraph) are registered on first use
//! and get the next free id.
//!
//! A catalog belongs to exactly one conversion. Ids therefore depend only on
//! the document, which keeps output deterministic.

use std::collections::HashMap;

use serde::Serialize;

use crate::ir::nodes::{ListKind, RunFormat, StyleRef, TableCellAlignment};

/// Numbering ids start at 1; `hh:heading idRef="0"` means no numbering.
const FIRST_NUMBERING_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontFace {
    Body,
    Heading,
    Code,
}

impl FontFace {
    /// Index of this face inside every `hh:fontface` list.
    pub fn id(self) -> u32 {
        match self {
            FontFace::Body => 0,
            FontFace::Heading => 1,
            FontFace::Code => 2,
        }
    }
}

/// Everything that distinguishes one `hh:charPr` from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CharShape {
    pub base: StyleRef,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub strike: bool,
    pub link: bool,
}

impl CharShape {
    pub fn baseline(style: StyleRef) -> Self {
        Self {
            base: style,
            bold: style == StyleRef::Title || style.heading_level().is_some(),
            italic: false,
            monospace: style == StyleRef::CodeText,
            strike: false,
            link: false,
        }
    }

    /// Font height in 1/100 pt.
    pub fn height(&self) -> u32 {
        match self.base {
            StyleRef::Title => 2000,
            StyleRef::Heading1 => 1800,
            StyleRef::Heading2 => 1600,
            StyleRef::Heading3 => 1400,
            StyleRef::Heading4 => 1300,
            StyleRef::Heading5 => 1200,
            StyleRef::Heading6 => 1100,
            StyleRef::CodeText => 900,
            StyleRef::BodyText | StyleRef::ListText | StyleRef::TableCell => 1000,
        }
    }

    pub fn face(&self) -> FontFace {
        if self.monospace {
            FontFace::Code
        } else if self.base == StyleRef::Title || self.base.heading_level().is_some() {
            FontFace::Heading
        } else {
            FontFace::Body
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParaAlign {
    Justify,
    Left,
    Center,
    Right,
}

impl ParaAlign {
    pub fn as_hwpx(self) -> &'static str {
        match self {
            ParaAlign::Justify => "JUSTIFY",
            ParaAlign::Left => "LEFT",
            ParaAlign::Center => "CENTER",
            ParaAlign::Right => "RIGHT",
        }
    }

    fn default_for(style: StyleRef) -> Self {
        match style {
            StyleRef::Title => ParaAlign::Center,
            StyleRef::BodyText | StyleRef::ListText => ParaAlign::Justify,
            _ => ParaAlign::Left,
        }
    }

    /// Alignment for a table cell paragraph. Header cells without an explicit
    /// column alignment are centered.
    pub fn for_cell(alignment: TableCellAlignment, header: bool) -> Self {
        match alignment {
            TableCellAlignment::Left => ParaAlign::Left,
            TableCellAlignment::Center => ParaAlign::Center,
            TableCellAlignment::Right => ParaAlign::Right,
            TableCellAlignment::None if header => ParaAlign::Center,
            TableCellAlignment::None => ParaAlign::Left,
        }
    }
}

/// List placement of a paragraph. `numbering` is `None` for continuation
/// paragraphs, which are indented like their item but carry no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListIndent {
    pub numbering: Option<u32>,
    pub level: u8,
}

/// Everything that distinguishes one `hh:paraPr` from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParaShape {
    pub base: StyleRef,
    pub align: ParaAlign,
    pub list: Option<ListIndent>,
    pub quote_level: u32,
}

impl ParaShape {
    pub fn baseline(style: StyleRef) -> Self {
        Self {
            base: style,
            align: ParaAlign::default_for(style),
            list: None,
            quote_level: 0,
        }
    }

    /// Line spacing in percent.
    pub fn line_spacing(&self) -> u32 {
        if self.base == StyleRef::CodeText {
            130
        } else {
            160
        }
    }

    /// Space before and after the paragraph, in HWPUNIT.
    pub fn spacing(&self) -> (u32, u32) {
        match self.base {
            StyleRef::Title => (0, 1600),
            StyleRef::Heading1 => (1600, 800),
            StyleRef::Heading2 | StyleRef::Heading3 => (1200, 600),
            StyleRef::Heading4 | StyleRef::Heading5 | StyleRef::Heading6 => (800, 400),
            StyleRef::TableCell => (0, 0),
            StyleRef::CodeText => (0, 0),
            StyleRef::BodyText | StyleRef::ListText => (0, 400),
        }
    }

    pub fn keep_with_next(&self) -> bool {
        self.base == StyleRef::Title || self.base.heading_level().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Numbering {
    pub id: u32,
    pub kind: ListKind,
}

impl Numbering {
    /// The `start` attribute of `hh:numbering`.
    pub fn start(&self) -> usize {
        match self.kind {
            ListKind::Ordered { start } => start,
            ListKind::Bullet => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleCatalog {
    char_shapes: Vec<CharShape>,
    para_shapes: Vec<ParaShape>,
    numberings: Vec<Numbering>,
    #[serde(skip)]
    char_index: HashMap<CharShape, u32>,
    #[serde(skip)]
    para_index: HashMap<ParaShape, u32>,
    #[serde(skip)]
    numbering_index: HashMap<usize, u32>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCatalog {
    /// A catalog holding only the baseline set, one charPr and paraPr per style.
    pub fn new() -> Self {
        let mut catalog = Self {
            char_shapes: Vec::new(),
            para_shapes: Vec::new(),
            numberings: Vec::new(),
            char_index: HashMap::new(),
            para_index: HashMap::new(),
            numbering_index: HashMap::new(),
        };
        for style in StyleRef::ALL {
            catalog.intern_char(CharShape::baseline(style));
            catalog.intern_para(ParaShape::baseline(style));
        }
        catalog
    }

    /// `hh:style` id of a style.
    pub fn style_id(&self, style: StyleRef) -> u32 {
        style.ordinal() as u32
    }

    /// charPr id for text of `format` inside a paragraph of `style`.
    pub fn char_pr(&mut self, style: StyleRef, format: RunFormat, link: bool) -> u32 {
        let base = CharShape::baseline(style);
        self.intern_char(CharShape {
            bold: base.bold || format.bold,
            italic: format.italic,
            monospace: base.monospace || format.code,
            strike: format.strike,
            link,
            ..base
        })
    }

    pub fn base_char_pr(&self, style: StyleRef) -> u32 {
        style.ordinal() as u32
    }

    pub fn para_pr(
        &mut self,
        style: StyleRef,
        list: Option<ListIndent>,
        quote_level: usize,
        align: Option<ParaAlign>,
    ) -> u32 {
        let base = ParaShape::baseline(style);
        self.intern_para(ParaShape {
            align: align.unwrap_or(base.align),
            list,
            quote_level: quote_level as u32,
            ..base
        })
    }

    /// Numbering id for a source list, registering it on first use.
    pub fn numbering(&mut self, list_id: usize, kind: ListKind) -> u32 {
        if let Some(&id) = self.numbering_index.get(&list_id) {
            return id;
        }
        let id = FIRST_NUMBERING_ID + self.numberings.len() as u32;
        self.numberings.push(Numbering { id, kind });
        self.numbering_index.insert(list_id, id);
        id
    }

    pub fn char_shapes(&self) -> &[CharShape] {
        &self.char_shapes
    }

    pub fn para_shapes(&self) -> &[ParaShape] {
        &self.para_shapes
    }

    pub fn numberings(&self) -> &[Numbering] {
        &self.numberings
    }

    fn intern_char(&mut self, shape: CharShape) -> u32 {
        if let Some(&id) = self.char_index.get(&shape) {
            return id;
        }
        let id = self.char_shapes.len() as u32;
        self.char_shapes.push(shape);
        self.char_index.insert(shape, id);
        id
    }

    fn intern_para(&mut self, shape: ParaShape) -> u32 {
        if let Some(&id) = self.para_index.get(&shape) {
            return id;
        }
        let id = self.para_shapes.len() as u32;
        self.para_shapes.push(shape);
        self.para_index.insert(shape, id);
        id
    }
}
