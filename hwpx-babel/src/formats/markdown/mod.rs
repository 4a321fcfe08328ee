//! Markdown format implementation
//!
//! This module implements Markdown import: source text → [`MarkdownDocument`].
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing. This choice is based on:
//! - CommonMark compliance, including the emphasis delimiter rules (an
//!   unmatched `*` is literal text, code spans bind tighter than emphasis)
//! - GFM extensions we need: tables, strikethrough, autolinks, task lists
//! - Front matter support
//!
//! # Element Mapping Table
//!
//! | Markdown               | MarkdownNode / Inline          | Notes                                   |
//! |------------------------|--------------------------------|-----------------------------------------|
//! | `# ... ######`         | Heading                        | Setext headings map the same way        |
//! | Paragraph              | Paragraph                      | Soft breaks become a single space       |
//! | `-` / `*` / `+` list   | BulletList                     | Task items record their checked state   |
//! | `1.` list              | OrderedList                    | Start number preserved                  |
//! | Fenced/indented code   | CodeBlock                      | First info word is the language         |
//! | Pipe table             | Table                          | Separator dash counts → column weights  |
//! | `---`                  | ThematicBreak                  |                                         |
//! | `>`                    | BlockQuote                     |                                         |
//! | Raw HTML block         | HtmlBlock                      | Policy applied by the model builder     |
//! | `*x*` / `**x**` / `~~x~~` | Emphasis / Strong / Strikethrough |                                  |
//! | `` `x` ``              | InlineCode                     |                                         |
//! | `[t](url)`, autolink   | Link                           |                                         |
//! | `![alt](src)`          | Image                          | Alt text only, never fetched            |
//! | Hard break             | LineBreak                      |                                         |
//! | Inline HTML            | RawHtml                        | Policy applied by the model builder     |
//!
//! Footnotes, math and other extensions are not enabled and come through as text.

pub mod ast;
pub mod parser;

pub use ast::{FrontMatter, Inline, ListItem, MarkdownDocument, MarkdownNode};
pub use parser::{parse, parse_with_options, ParseOptions};
