//! Markdown import tests.

use hwpx_babel::formats::markdown::{Inline, MarkdownNode};
use hwpx_babel::parse;
use proptest::prelude::*;

fn first_paragraph(source: &str) -> Vec<Inline> {
    match parse(source).blocks.into_iter().next() {
        Some(MarkdownNode::Paragraph { content }) => content,
        other => panic!("expected a paragraph, got {other:?}"),
    }
}

#[test]
fn test_front_matter_is_lifted_out_of_the_body() {
    let doc = parse(crate::common::PROPOSAL);
    assert_eq!(doc.front_matter.title.as_deref(), Some("2025 사업 계획서"));
    assert_eq!(doc.front_matter.author.as_deref(), Some("Kim"));
    assert_eq!(doc.front_matter.date.as_deref(), Some("2025-01-15"));
    assert!(matches!(
        doc.blocks.first(),
        Some(MarkdownNode::Heading { level: 1, .. })
    ));
}

#[test]
fn test_soft_and_hard_breaks() {
    let content = first_paragraph("one\ntwo  \nthree\n");
    assert_eq!(
        content,
        vec![
            Inline::Text("one".to_string()),
            Inline::Text(" ".to_string()),
            Inline::Text("two".to_string()),
            Inline::LineBreak,
            Inline::Text("three".to_string()),
        ]
    );
}

#[test]
fn test_seven_hashes_is_a_paragraph() {
    let doc = parse("####### too deep\n");
    assert!(matches!(doc.blocks[0], MarkdownNode::Paragraph { .. }));
}

#[test]
fn test_inline_html_is_kept_raw() {
    let content = first_paragraph("press <kbd>Ctrl</kbd> now\n");
    assert!(content.contains(&Inline::RawHtml("<kbd>".to_string())));
}

#[test]
fn test_html_block_records_its_line() {
    let doc = parse("# Title\n\n<div>\nboxed\n</div>\n");
    match &doc.blocks[1] {
        MarkdownNode::HtmlBlock { raw, line } => {
            assert_eq!(*line, 3);
            assert!(raw.contains("boxed"));
        }
        other => panic!("expected html block, got {other:?}"),
    }
}

#[test]
fn test_autolinks_and_images() {
    let content = first_paragraph("see https://example.com and ![chart](c.png)\n");
    assert!(content.iter().any(|inline| matches!(
        inline,
        Inline::Link { href, .. } if href == "https://example.com"
    )));
    assert!(content.contains(&Inline::Image {
        src: "c.png".to_string(),
        alt: "chart".to_string(),
    }));
}

#[test]
fn test_strikethrough() {
    let content = first_paragraph("~~gone~~\n");
    assert_eq!(
        content,
        vec![Inline::Strikethrough(vec![Inline::Text("gone".to_string())])]
    );
}

#[test]
fn test_ordered_list_start_is_preserved() {
    let doc = parse("3. three\n4. four\n");
    match &doc.blocks[0] {
        MarkdownNode::OrderedList { start, items } => {
            assert_eq!(*start, 3);
            assert_eq!(items.len(), 2);
        }
        other => panic!("expected ordered list, got {other:?}"),
    }
}

#[test]
fn test_front_matter_is_read_as_yaml() {
    let source = "---\ntitle: >\n  Annual\n  report # not a comment\nauthor: 'O''Neil' # reviewer\nmeta:\n  date: 2020-01-01\n---\n\nbody\n";
    let doc = parse(source);
    assert_eq!(
        doc.front_matter.title.as_deref(),
        Some("Annual report # not a comment")
    );
    assert_eq!(doc.front_matter.author.as_deref(), Some("O'Neil"));
    assert_eq!(doc.front_matter.date, None);
    assert!(matches!(doc.blocks.as_slice(), [MarkdownNode::Paragraph { .. }]));
}

#[test]
fn test_emphasis_across_lines_stays_literal() {
    let content = first_paragraph("*a\nb* and **c\nd**\n");
    let text: String = content
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => text.as_str(),
            other => panic!("expected plain text, got {other:?}"),
        })
        .collect();
    assert_eq!(text, "*a b* and **c d**");

    let content = first_paragraph("*a* b\n**c**\n");
    assert!(matches!(content[0], Inline::Emphasis(_)));
    assert!(content.iter().any(|inline| matches!(inline, Inline::Strong(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_parse_is_total(source in any::<String>()) {
        let _ = parse(&source);
    }

    #[test]
    fn test_parse_is_total_on_markdown_like_input(
        source in "([#>*_`~|\\-\\[\\]()!:\n ]|[a-z]|[0-9]\\.){0,120}"
    ) {
        let _ = parse(&source);
    }
}
