//! Lowers a markdown tree into the flat document model.
//!
//! # The High-Level Concept
//!
//! HWPX has no nested block containers: a list item three levels deep is a
//! paragraph whose paragraph properties say "numbering N, level 2, indented".
//! So instead of mirroring markdown's tree we walk it in document order and
//! emit one [`Block`] per output paragraph, tagging each with the list depth
//! and quote level it was found at.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Push the document's top-level nodes on a work stack in reverse order
//!
//! 2. **Leaf blocks** (heading, paragraph, code, table, rule, HTML):
//!    - Resolve the style, lower inlines to runs, append a `Block`
//!
//! 3. **Containers** (lists, list items, block quotes):
//!    - Push children back on the stack (reversed, so they pop in order) with
//!      an updated [`Context`]: list depth + 1, or quote level + 1
//!    - A list item's first paragraph becomes the marked `ListItem` block;
//!      later paragraphs of the item become unmarked continuations
//!
//! 4. **Completion:**
//!    - Reject if the strict policy collected unsupported constructs
//!    - Guarantee at least one paragraph
//!
//! The explicit stack keeps native stack usage constant regardless of how
//! deeply the source nests.

use crate::common::images::{ImageResolver, ImageTable, NoImages};
use crate::common::runs::{push_text, RunBuilder};
use crate::common::table;
use crate::error::{ConversionError, UnsupportedConstruct};
use crate::formats::markdown::{Inline, ListItem, MarkdownDocument, MarkdownNode};
use crate::ir::nodes::{
    Block, BlockKind, DocumentModel, ListKind, ListMarker, Metadata, Run, RunFormat, StyleRef,
};
use crate::options::{ConversionOptions, UnsupportedPolicy};

/// Build a document model with default options.
pub fn build(doc: &MarkdownDocument) -> Result<DocumentModel, ConversionError> {
    build_with_options(doc, &ConversionOptions::default())
}

/// Lower a parsed markdown document into a [`DocumentModel`]. Pictures keep
/// their alt text.
pub fn build_with_options(
    doc: &MarkdownDocument,
    options: &ConversionOptions,
) -> Result<DocumentModel, ConversionError> {
    build_with_resolver(doc, options, &NoImages)
}

/// Like [`build_with_options`], embedding every picture `resolver` can supply.
pub fn build_with_resolver(
    doc: &MarkdownDocument,
    options: &ConversionOptions,
    resolver: &dyn ImageResolver,
) -> Result<DocumentModel, ConversionError> {
    let mut builder = ModelBuilder {
        options,
        blocks: Vec::new(),
        next_list_id: 0,
        unsupported: Vec::new(),
        images: ImageTable::new(resolver, options),
        seen_content: false,
    };
    builder.walk(doc);
    builder.finish(doc)
}

/// Where in the container structure a node sits.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    depth: usize,
    quote_level: usize,
    in_list: bool,
}

enum Work<'a> {
    Node(&'a MarkdownNode, Context),
    Item {
        item: &'a ListItem,
        marker: ListMarker,
        ctx: Context,
    },
}

struct ModelBuilder<'o> {
    options: &'o ConversionOptions,
    blocks: Vec<Block>,
    next_list_id: usize,
    unsupported: Vec<UnsupportedConstruct>,
    images: ImageTable<'o>,
    /// Set once a non-title block has been emitted
    seen_content: bool,
}

impl<'o> ModelBuilder<'o> {
    fn walk(&mut self, doc: &MarkdownDocument) {
        if self.options.emit_title_block {
            if let Some(title) = &doc.front_matter.title {
                let runs = vec![Run::text(title.as_str(), RunFormat::plain())];
                self.push(
                    StyleRef::Title,
                    Context::default(),
                    BlockKind::Paragraph { runs },
                );
            }
        }

        let mut stack: Vec<Work<'_>> = doc
            .blocks
            .iter()
            .rev()
            .map(|node| Work::Node(node, Context::default()))
            .collect();

        while let Some(work) = stack.pop() {
            match work {
                Work::Node(node, ctx) => self.node(node, ctx, &mut stack),
                Work::Item { item, marker, ctx } => self.item(item, marker, ctx, &mut stack),
            }
        }
    }

    fn node<'a>(&mut self, node: &'a MarkdownNode, ctx: Context, stack: &mut Vec<Work<'a>>) {
        match node {
            MarkdownNode::Heading { level, content } => {
                let runs = self.runs(content);
                self.push(
                    StyleRef::heading(*level),
                    ctx,
                    BlockKind::Heading {
                        level: *level,
                        runs,
                    },
                );
            }
            MarkdownNode::Paragraph { content } => {
                let runs = self.runs(content);
                self.paragraph(ctx, runs);
            }
            MarkdownNode::BulletList { items } => self.list(items, ListKind::Bullet, ctx, stack),
            MarkdownNode::OrderedList { start, items } => {
                self.list(items, ListKind::Ordered { start: *start }, ctx, stack)
            }
            MarkdownNode::CodeBlock { language, text } => self.push(
                StyleRef::CodeText,
                ctx,
                BlockKind::Code {
                    language: language.clone(),
                    lines: code_lines(text),
                },
            ),
            MarkdownNode::Table {
                alignments,
                weights,
                rows,
            } => {
                let rows = rows
                    .iter()
                    .map(|row| row.iter().map(|cell| self.runs(cell)).collect())
                    .collect();
                let table = table::normalize(rows, alignments.clone(), weights.clone());
                self.push(StyleRef::TableCell, ctx, BlockKind::Table(table));
            }
            MarkdownNode::ThematicBreak => self.push(StyleRef::BodyText, ctx, BlockKind::Rule),
            MarkdownNode::BlockQuote { children } => {
                let inner = Context {
                    quote_level: ctx.quote_level + 1,
                    ..ctx
                };
                for child in children.iter().rev() {
                    stack.push(Work::Node(child, inner));
                }
            }
            MarkdownNode::HtmlBlock { raw, line } => self.html_block(raw, *line, ctx),
        }
    }

    fn list<'a>(
        &mut self,
        items: &'a [ListItem],
        kind: ListKind,
        ctx: Context,
        stack: &mut Vec<Work<'a>>,
    ) {
        let list_id = self.next_list_id;
        self.next_list_id += 1;

        let item_ctx = Context {
            depth: if ctx.in_list { ctx.depth + 1 } else { 0 },
            in_list: true,
            ..ctx
        };
        let first = match kind {
            ListKind::Ordered { start } => start,
            ListKind::Bullet => 1,
        };

        for (i, item) in items.iter().enumerate().rev() {
            stack.push(Work::Item {
                item,
                marker: ListMarker {
                    list_id,
                    kind,
                    ordinal: first + i,
                },
                ctx: item_ctx,
            });
        }
    }

    fn item<'a>(
        &mut self,
        item: &'a ListItem,
        marker: ListMarker,
        ctx: Context,
        stack: &mut Vec<Work<'a>>,
    ) {
        let mut children = item.children.iter();
        let lead: &[Inline] = match item.children.first() {
            Some(MarkdownNode::Paragraph { content }) => {
                children.next();
                content
            }
            _ => &[],
        };

        let mut builder = RunBuilder::new(
            self.options.unsupported,
            &mut self.unsupported,
            &mut self.images,
        );
        match item.checked {
            Some(true) => builder.push_text("☑ ", RunFormat::plain(), None),
            Some(false) => builder.push_text("☐ ", RunFormat::plain(), None),
            None => {}
        }
        let runs = builder.inlines(lead, RunFormat::plain());

        self.push(
            StyleRef::ListText,
            ctx,
            BlockKind::ListItem {
                marker: Some(marker),
                runs,
            },
        );

        for child in children.rev() {
            stack.push(Work::Node(child, ctx));
        }
    }

    fn html_block(&mut self, raw: &str, line: usize, ctx: Context) {
        match self.options.unsupported {
            UnsupportedPolicy::Reject => {
                self.unsupported
                    .push(UnsupportedConstruct::new("raw HTML block", Some(line)));
                return;
            }
            UnsupportedPolicy::Degrade => {
                log::warn!("raw HTML block at line {line} kept as plain text");
            }
        }

        let mut runs = Vec::new();
        for (i, text) in raw.trim_end().lines().enumerate() {
            if i > 0 {
                runs.push(Run::LineBreak);
            }
            push_text(&mut runs, text, RunFormat::plain(), None);
        }
        self.paragraph(ctx, runs);
    }

    /// Plain paragraph, or an unmarked list continuation inside a list item.
    fn paragraph(&mut self, ctx: Context, runs: Vec<Run>) {
        if ctx.in_list {
            self.push(
                StyleRef::ListText,
                ctx,
                BlockKind::ListItem { marker: None, runs },
            );
        } else {
            self.push(StyleRef::BodyText, ctx, BlockKind::Paragraph { runs });
        }
    }

    fn runs(&mut self, content: &[Inline]) -> Vec<Run> {
        RunBuilder::new(
            self.options.unsupported,
            &mut self.unsupported,
            &mut self.images,
        )
        .inlines(content, RunFormat::plain())
    }

    fn push(&mut self, style: StyleRef, ctx: Context, kind: BlockKind) {
        let page_break_before =
            self.options.page_break_before_h1 && style == StyleRef::Heading1 && self.seen_content;
        if style != StyleRef::Title {
            self.seen_content = true;
        }
        self.blocks.push(Block {
            index: self.blocks.len(),
            style,
            depth: ctx.depth,
            quote_level: ctx.quote_level,
            page_break_before,
            kind,
        });
    }

    fn finish(mut self, doc: &MarkdownDocument) -> Result<DocumentModel, ConversionError> {
        if !self.unsupported.is_empty() {
            log::info!(
                "rejecting document with {} unsupported construct(s)",
                self.unsupported.len()
            );
            return Err(ConversionError::UnsupportedConstruct(self.unsupported));
        }

        if self.blocks.is_empty() {
            self.push(
                StyleRef::BodyText,
                Context::default(),
                BlockKind::Paragraph { runs: Vec::new() },
            );
        }

        let front_matter = &doc.front_matter;
        Ok(DocumentModel {
            metadata: Metadata {
                title: front_matter.title.clone(),
                author: front_matter.author.clone(),
                date: front_matter.date.clone(),
            },
            blocks: self.blocks,
            binaries: self.images.into_items(),
        })
    }
}

/// Split code block text into lines, keeping interior blank lines.
fn code_lines(text: &str) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
