//! Markdown parsing
//!
//! Converts CommonMark (+ GFM tables, strikethrough, autolinks and task lists)
//! into an owned [`MarkdownDocument`].
//! Pipeline: Markdown string → Comrak AST → MarkdownNode tree
//!
//! Parsing never fails. Anything comrak accepts but we have no node for is
//! kept as plain text, and nesting beyond the configured depth is flattened
//! so the lowering below recurses a bounded number of times.

use super::ast::{FrontMatter, Inline, ListItem, MarkdownDocument, MarkdownNode};
use crate::ir::nodes::TableCellAlignment;
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Options for [`parse_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 20,
        }
    }
}

/// Parse a Markdown string with default options.
pub fn parse(source: &str) -> MarkdownDocument {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse a Markdown string into a [`MarkdownDocument`].
pub fn parse_with_options(source: &str, options: &ParseOptions) -> MarkdownDocument {
    let arena = Arena::new();
    let comrak_options = default_comrak_options();
    let root = parse_document(&arena, source, &comrak_options);

    let mut lowering = Lowering {
        lines: source.lines().collect(),
        max_depth: options.max_nesting_depth.max(1),
        front_matter: None,
        front_matter_lines: 0,
        clamped: 0,
    };
    let blocks = lowering.blocks(root, 0);

    if lowering.clamped > 0 {
        log::warn!(
            "flattened {} construct(s) nested deeper than {} levels",
            lowering.clamped,
            lowering.max_depth
        );
    }

    MarkdownDocument {
        front_matter: lowering.front_matter.unwrap_or_default(),
        blocks,
    }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

struct Lowering<'s> {
    lines: Vec<&'s str>,
    max_depth: usize,
    front_matter: Option<FrontMatter>,
    front_matter_lines: usize,
    /// Number of subtrees flattened by the depth cap
    clamped: usize,
}

impl<'s> Lowering<'s> {
    fn blocks<'a>(&mut self, parent: &'a AstNode<'a>, depth: usize) -> Vec<MarkdownNode> {
        let mut out = Vec::new();
        for child in parent.children() {
            self.block(child, depth, &mut out);
        }
        out
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, out: &mut Vec<MarkdownNode>) {
        let data = node.data.borrow();

        match &data.value {
            NodeValue::Document => {
                for child in node.children() {
                    self.block(child, depth, out);
                }
            }

            NodeValue::FrontMatter(raw) => {
                self.front_matter_lines = raw.lines().count();
                self.front_matter = Some(FrontMatter::parse(raw));
            }

            NodeValue::Heading(heading) => out.push(MarkdownNode::Heading {
                level: heading.level,
                content: self.inlines(node, 0),
            }),

            NodeValue::Paragraph => out.push(MarkdownNode::Paragraph {
                content: self.inlines(node, 0),
            }),

            NodeValue::List(list) => {
                if depth >= self.max_depth {
                    self.clamp_block(node, out);
                    return;
                }
                let items = node
                    .children()
                    .map(|item| ListItem {
                        checked: task_state(item),
                        children: self.blocks(item, depth + 1),
                    })
                    .collect();
                if matches!(list.list_type, ListType::Ordered) {
                    out.push(MarkdownNode::OrderedList {
                        start: list.start,
                        items,
                    });
                } else {
                    out.push(MarkdownNode::BulletList { items });
                }
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .map(|lang| lang.to_string());
                out.push(MarkdownNode::CodeBlock {
                    language,
                    text: code_block.literal.to_string(),
                });
            }

            NodeValue::HtmlBlock(html) => out.push(MarkdownNode::HtmlBlock {
                raw: html.literal.to_string(),
                line: data.sourcepos.start.line,
            }),

            NodeValue::ThematicBreak => out.push(MarkdownNode::ThematicBreak),

            NodeValue::BlockQuote => {
                if depth >= self.max_depth {
                    self.clamp_block(node, out);
                    return;
                }
                out.push(MarkdownNode::BlockQuote {
                    children: self.blocks(node, depth + 1),
                });
            }

            NodeValue::Table(table) => {
                let alignments: Vec<TableCellAlignment> =
                    table.alignments.iter().map(convert_alignment).collect();
                let weights = self.column_weights(data.sourcepos.start.line, alignments.len());
                let rows = node
                    .children()
                    .map(|row| row.children().map(|cell| self.inlines(cell, 0)).collect())
                    .collect();
                out.push(MarkdownNode::Table {
                    alignments,
                    weights,
                    rows,
                });
            }

            _ => {
                // Footnote definitions, description lists and other extension
                // blocks are disabled; anything that still shows up keeps its text.
                let text = flatten_text(node);
                if !text.is_empty() {
                    out.push(MarkdownNode::Paragraph {
                        content: vec![Inline::Text(text)],
                    });
                }
            }
        }
    }

    fn inlines<'a>(&mut self, parent: &'a AstNode<'a>, depth: usize) -> Vec<Inline> {
        let mut out = Vec::new();
        for child in parent.children() {
            self.inline(child, depth, &mut out);
        }
        out
    }

    fn inline<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, out: &mut Vec<Inline>) {
        let data = node.data.borrow();

        let nested = matches!(
            data.value,
            NodeValue::Emph | NodeValue::Strong | NodeValue::Strikethrough | NodeValue::Link(_)
        );
        if nested && depth >= self.max_depth {
            self.clamped += 1;
            out.push(Inline::Text(flatten_text(node)));
            return;
        }

        match &data.value {
            NodeValue::Text(text) => out.push(Inline::Text(text.to_string())),
            NodeValue::SoftBreak => out.push(Inline::Text(" ".to_string())),
            NodeValue::LineBreak => out.push(Inline::LineBreak),
            NodeValue::Code(code) => out.push(Inline::InlineCode(code.literal.to_string())),
            NodeValue::Emph => self.span(node, depth, ('*', 1), Inline::Emphasis, out),
            NodeValue::Strong => self.span(node, depth, ('*', 2), Inline::Strong, out),
            NodeValue::Strikethrough => {
                self.span(node, depth, ('~', 2), Inline::Strikethrough, out)
            }
            NodeValue::Link(link) => out.push(Inline::Link {
                href: link.url.to_string(),
                children: self.inlines(node, depth + 1),
            }),
            NodeValue::Image(link) => out.push(Inline::Image {
                src: link.url.to_string(),
                alt: flatten_text(node),
            }),
            NodeValue::HtmlInline(raw) => out.push(Inline::RawHtml(raw.to_string())),
            _ => {
                let text = flatten_text(node);
                if !text.is_empty() {
                    out.push(Inline::Text(text));
                }
            }
        }
    }

    /// Emphasis, strong and strikethrough must open and close on one line.
    /// A span comrak paired across a line break is unwound: its delimiters
    /// come back as literal text around the lowered children.
    fn span<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        (fallback, width): (char, usize),
        wrap: fn(Vec<Inline>) -> Inline,
        out: &mut Vec<Inline>,
    ) {
        let children = self.inlines(node, depth + 1);
        if !crosses_line(node) {
            out.push(wrap(children));
            return;
        }
        let marker = self.delimiter(node, fallback, width);
        out.push(Inline::Text(marker.clone()));
        out.extend(children);
        out.push(Inline::Text(marker));
    }

    /// Opening delimiter of a span as written in the source (`*` or `_`,
    /// `~` or `~~`), falling back to `fallback` repeated `width` times.
    fn delimiter<'a>(&self, node: &'a AstNode<'a>, fallback: char, width: usize) -> String {
        let start = node.data.borrow().sourcepos.start;
        let rest = start
            .line
            .checked_sub(1)
            .and_then(|line| self.lines.get(line))
            .and_then(|line| line.get(start.column.saturating_sub(1)..))
            .unwrap_or_default();
        match rest.chars().next() {
            Some(marker @ ('*' | '_' | '~')) => {
                let run = rest.chars().take_while(|c| *c == marker).count();
                marker.to_string().repeat(run.clamp(1, width))
            }
            _ => fallback.to_string().repeat(width),
        }
    }

    fn clamp_block<'a>(&mut self, node: &'a AstNode<'a>, out: &mut Vec<MarkdownNode>) {
        self.clamped += 1;
        let text = flatten_text(node);
        if !text.is_empty() {
            out.push(MarkdownNode::Paragraph {
                content: vec![Inline::Text(text)],
            });
        }
    }

    /// Dash counts of the table's separator row, used as relative column
    /// widths. Comrak doesn't keep the separator, so it is re-read from the
    /// source near the table's first line.
    fn column_weights(&self, start_line: usize, columns: usize) -> Option<Vec<u32>> {
        let first = start_line.saturating_sub(1);
        let last = (start_line + 1 + self.front_matter_lines).min(self.lines.len());
        self.lines
            .get(first..last)?
            .iter()
            .find_map(|line| separator_weights(line, columns))
    }
}

fn crosses_line<'a>(node: &'a AstNode<'a>) -> bool {
    node.descendants().skip(1).any(|descendant| {
        matches!(
            descendant.data.borrow().value,
            NodeValue::SoftBreak | NodeValue::LineBreak
        )
    })
}

fn task_state<'a>(item: &'a AstNode<'a>) -> Option<bool> {
    match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    }
}

fn convert_alignment(alignment: &TableAlignment) -> TableCellAlignment {
    match alignment {
        TableAlignment::Left => TableCellAlignment::Left,
        TableAlignment::Center => TableCellAlignment::Center,
        TableAlignment::Right => TableCellAlignment::Right,
        TableAlignment::None => TableCellAlignment::None,
    }
}

/// Parse a `| --- | :---: |` separator row into per-column dash counts.
fn separator_weights(line: &str, columns: usize) -> Option<Vec<u32>> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let mut weights = Vec::new();
    for cell in trimmed.split('|') {
        let dashes = cell.trim().trim_start_matches(':').trim_end_matches(':');
        if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
            return None;
        }
        weights.push(dashes.len() as u32);
    }
    (weights.len() == columns).then_some(weights)
}

/// Plain text of a subtree, whitespace-collapsed.
///
/// Uses comrak's iterative traversal so it is safe on arbitrarily deep input.
fn flatten_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants().skip(1) {
        match &descendant.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::CodeBlock(code_block) => {
                text.push(' ');
                text.push_str(&code_block.literal);
            }
            NodeValue::HtmlInline(raw) => text.push_str(raw),
            NodeValue::HtmlBlock(html) => {
                text.push(' ');
                text.push_str(&html.literal);
            }
            NodeValue::SoftBreak
            | NodeValue::LineBreak
            | NodeValue::Paragraph
            | NodeValue::Heading(_)
            | NodeValue::Item(_)
            | NodeValue::TaskItem(_)
            | NodeValue::TableCell => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
