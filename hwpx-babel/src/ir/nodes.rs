//! Core data structures for the document model.
//!
//! The model is a flat, indexed sequence of [`Block`]s. Nesting that markdown
//! expresses as a tree (lists inside lists, quotes inside quotes) is carried
//! as `depth` / `quote_level` numbers, which is how HWPX itself represents it:
//! indentation plus a numbering reference rather than nested containers.

use serde::Serialize;

/// The closed set of paragraph styles a block can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StyleRef {
    BodyText,
    Title,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    ListText,
    CodeText,
    TableCell,
}

impl StyleRef {
    /// Every style, in catalog order. `BodyText` comes first because HWPX
    /// treats style 0 as the document's normal style.
    pub const ALL: [StyleRef; 11] = [
        StyleRef::BodyText,
        StyleRef::Title,
        StyleRef::Heading1,
        StyleRef::Heading2,
        StyleRef::Heading3,
        StyleRef::Heading4,
        StyleRef::Heading5,
        StyleRef::Heading6,
        StyleRef::ListText,
        StyleRef::CodeText,
        StyleRef::TableCell,
    ];

    /// Style for a markdown heading level. Levels outside 1..=6 fall back to body text.
    pub fn heading(level: u8) -> StyleRef {
        match level {
            1 => StyleRef::Heading1,
            2 => StyleRef::Heading2,
            3 => StyleRef::Heading3,
            4 => StyleRef::Heading4,
            5 => StyleRef::Heading5,
            6 => StyleRef::Heading6,
            _ => StyleRef::BodyText,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            StyleRef::Heading1 => Some(1),
            StyleRef::Heading2 => Some(2),
            StyleRef::Heading3 => Some(3),
            StyleRef::Heading4 => Some(4),
            StyleRef::Heading5 => Some(5),
            StyleRef::Heading6 => Some(6),
            _ => None,
        }
    }

    /// Position of this style in [`StyleRef::ALL`].
    pub fn ordinal(self) -> usize {
        StyleRef::ALL
            .iter()
            .position(|style| *style == self)
            .unwrap_or(0)
    }
}

/// A fully lowered document, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    pub metadata: Metadata,
    pub blocks: Vec<Block>,
    /// Embedded pictures, in first-use order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub binaries: Vec<BinaryItem>,
}

/// An image stored in the package under `BinData/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryItem {
    /// Manifest id, `image1`, `image2`, ...
    pub id: String,
    pub extension: &'static str,
    pub media_type: &'static str,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl BinaryItem {
    /// Path of the item inside the package.
    pub fn path(&self) -> String {
        format!("BinData/{}.{}", self.id, self.extension)
    }
}

/// Document-level properties taken from front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// One output paragraph (or paragraph-anchored table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Position in the output, dense from 0
    pub index: usize,
    pub style: StyleRef,
    /// List nesting level (0 for top-level items and for non-list blocks)
    pub depth: usize,
    /// Number of enclosing block quotes
    pub quote_level: usize,
    pub page_break_before: bool,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Heading {
        level: u8,
        runs: Vec<Run>,
    },
    Paragraph {
        runs: Vec<Run>,
    },
    /// A list paragraph. Only the first paragraph of an item carries a marker;
    /// later paragraphs of the same item are continuations.
    ListItem {
        marker: Option<ListMarker>,
        runs: Vec<Run>,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table(Table),
    /// Thematic break
    Rule,
}

impl BlockKind {
    pub fn runs(&self) -> &[Run] {
        match self {
            BlockKind::Heading { runs, .. }
            | BlockKind::Paragraph { runs }
            | BlockKind::ListItem { runs, .. } => runs,
            BlockKind::Code { .. } | BlockKind::Table(_) | BlockKind::Rule => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListMarker {
    /// Identifies the source list; dense per document, in document order
    pub list_id: usize,
    pub kind: ListKind,
    /// Item number for ordered lists, 1-based position for bullets
    pub ordinal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListKind {
    Bullet,
    Ordered { start: usize },
}

/// Character formatting flags shared by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub strike: bool,
}

impl RunFormat {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_code(mut self) -> Self {
        self.code = true;
        self
    }

    pub fn with_strike(mut self) -> Self {
        self.strike = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Run {
    Text(TextRun),
    Image(ImageRun),
    LineBreak,
}

impl Run {
    pub fn text(text: impl Into<String>, format: RunFormat) -> Self {
        Run::Text(TextRun {
            text: text.into(),
            format,
            link: None,
        })
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Run::Text(run) => Some(run),
            Run::Image(_) | Run::LineBreak => None,
        }
    }
}

/// A span of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub format: RunFormat,
    /// Hyperlink target, if the span sits inside a link
    pub link: Option<String>,
}

impl TextRun {
    /// Whether `other` can be appended to this run without crossing a
    /// formatting boundary.
    pub fn same_shape(&self, other: &TextRun) -> bool {
        self.format == other.format && self.link == other.link
    }
}

/// An inline picture, sized in HWPUNIT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRun {
    /// Id of the [`BinaryItem`] holding the picture
    pub binary_id: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// A table whose rows have all been padded to `columns` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: usize,
    pub alignments: Vec<TableCellAlignment>,
    /// Relative column widths (separator dash counts), when available
    pub weights: Option<Vec<u32>>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub header: bool,
    pub cells: Vec<Vec<Run>>,
}

/// Alignment of a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TableCellAlignment {
    Left,
    Center,
    Right,
    #[default]
    None,
}
