//! Markdown syntax tree.
//!
//! A closed, owned mirror of the subset of comrak's AST we convert. Owning
//! the tree (instead of holding on to comrak's arena) lets the builder run
//! after parsing without lifetimes leaking into the public API.

use crate::ir::nodes::TableCellAlignment;
use serde::Serialize;

/// A parsed markdown document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkdownDocument {
    pub front_matter: FrontMatter,
    pub blocks: Vec<MarkdownNode>,
}

/// Recognized keys from a leading `---` front matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl FrontMatter {
    /// Read `title`, `author` and `date` from a front matter block.
    ///
    /// `raw` is the block as comrak hands it over, `---` fences included.
    /// Only top-level scalar values count: nested mappings, sequences and
    /// nulls are ignored. YAML that does not parse as a mapping yields an
    /// empty front matter and a warning.
    pub fn parse(raw: &str) -> Self {
        let yaml = strip_fences(raw);
        if yaml.trim().is_empty() {
            return FrontMatter::default();
        }
        let mapping = match serde_yaml::from_str::<serde_yaml::Value>(&yaml) {
            Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
            Ok(_) => {
                log::warn!("front matter is not a key/value mapping; ignoring it");
                return FrontMatter::default();
            }
            Err(err) => {
                log::warn!("front matter is not valid YAML ({err}); ignoring it");
                return FrontMatter::default();
            }
        };
        FrontMatter {
            title: scalar(&mapping, "title"),
            author: scalar(&mapping, "author"),
            date: scalar(&mapping, "date"),
        }
    }
}

fn strip_fences(raw: &str) -> String {
    let mut lines = raw.lines().peekable();
    if lines.peek().is_some_and(|line| line.trim_end() == "---") {
        lines.next();
    }
    lines
        .take_while(|line| !matches!(line.trim_end(), "---" | "..."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn scalar(mapping: &serde_yaml::Mapping, key: &str) -> Option<String> {
    let value = match mapping.get(key)? {
        serde_yaml::Value::String(text) => text.trim().to_string(),
        serde_yaml::Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Block-level markdown node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkdownNode {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    BulletList {
        items: Vec<ListItem>,
    },
    OrderedList {
        start: usize,
        items: Vec<ListItem>,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    /// The first row is the header row.
    Table {
        alignments: Vec<TableCellAlignment>,
        weights: Option<Vec<u32>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    ThematicBreak,
    BlockQuote {
        children: Vec<MarkdownNode>,
    },
    HtmlBlock {
        raw: String,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    /// `Some` for task list items
    pub checked: Option<bool>,
    pub children: Vec<MarkdownNode>,
}

/// Inline span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    InlineCode(String),
    Link { href: String, children: Vec<Inline> },
    Image { src: String, alt: String },
    LineBreak,
    RawHtml(String),
}
