//! Lowering of markdown inline spans into formatted runs.
//!
//! Nested emphasis in the AST (`**a *b* c**`) becomes a flat list of runs,
//! each carrying the union of the formatting around it. Adjacent text with
//! the same formatting and link target is merged, so a bold span is always a
//! single run no matter how comrak split its text nodes. Pictures the
//! [`ImageTable`] can embed become image runs; the rest keep their alt text.

use crate::common::images::ImageTable;
use crate::error::UnsupportedConstruct;
use crate::formats::markdown::Inline;
use crate::ir::nodes::{Run, RunFormat, TextRun};
use crate::options::UnsupportedPolicy;

/// Collects runs for one paragraph.
pub(crate) struct RunBuilder<'u, 'r> {
    runs: Vec<Run>,
    policy: UnsupportedPolicy,
    unsupported: &'u mut Vec<UnsupportedConstruct>,
    images: &'u mut ImageTable<'r>,
}

impl<'u, 'r> RunBuilder<'u, 'r> {
    pub(crate) fn new(
        policy: UnsupportedPolicy,
        unsupported: &'u mut Vec<UnsupportedConstruct>,
        images: &'u mut ImageTable<'r>,
    ) -> Self {
        Self {
            runs: Vec::new(),
            policy,
            unsupported,
            images,
        }
    }

    pub(crate) fn inlines(mut self, inlines: &[Inline], format: RunFormat) -> Vec<Run> {
        self.walk(inlines, format, None);
        self.runs
    }

    /// Append `text` as a run, merging it into the previous run when the
    /// formatting matches.
    pub(crate) fn push_text(&mut self, text: &str, format: RunFormat, link: Option<&str>) {
        push_text(&mut self.runs, text, format, link);
    }

    fn walk(&mut self, inlines: &[Inline], format: RunFormat, link: Option<&str>) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => self.push_text(text, format, link),
                Inline::Emphasis(children) => self.walk(children, format.with_italic(), link),
                Inline::Strong(children) => self.walk(children, format.with_bold(), link),
                Inline::Strikethrough(children) => {
                    self.walk(children, format.with_strike(), link)
                }
                Inline::InlineCode(code) => self.push_text(code, format.with_code(), link),
                Inline::Link { href, children } => {
                    if children.is_empty() {
                        self.push_text(href, format, Some(href.as_str()));
                    } else {
                        self.walk(children, format, Some(href.as_str()));
                    }
                }
                Inline::Image { src, alt } => match self.images.embed(src, alt) {
                    Some(image) => self.runs.push(Run::Image(image)),
                    None => {
                        let label = if alt.is_empty() { src } else { alt };
                        self.push_text(label, format, link);
                    }
                },
                Inline::LineBreak => self.runs.push(Run::LineBreak),
                Inline::RawHtml(raw) => {
                    if self.policy == UnsupportedPolicy::Reject {
                        self.unsupported
                            .push(UnsupportedConstruct::new("inline HTML", None));
                    }
                    self.push_text(raw, format, link);
                }
            }
        }
    }
}

pub(crate) fn push_text(runs: &mut Vec<Run>, text: &str, format: RunFormat, link: Option<&str>) {
    if text.is_empty() {
        return;
    }
    let candidate = TextRun {
        text: String::new(),
        format,
        link: link.map(str::to_string),
    };
    if let Some(Run::Text(last)) = runs.last_mut() {
        if last.same_shape(&candidate) {
            last.text.push_str(text);
            return;
        }
    }
    runs.push(Run::Text(TextRun {
        text: text.to_string(),
        ..candidate
    }));
}

/// Plain text of a run list, line breaks as `\n`.
pub fn runs_to_text(runs: &[Run]) -> String {
    let mut text = String::new();
    for run in runs {
        match run {
            Run::Text(run) => text.push_str(&run.text),
            Run::Image(image) => text.push_str(&image.alt),
            Run::LineBreak => text.push('\n'),
        }
    }
    text
}
