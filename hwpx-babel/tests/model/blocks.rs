//! Block mapping from markdown to the document model.

use crate::common::{is_empty_paragraph, model, model_with, text_of, PROPOSAL_MODEL};
use hwpx_babel::common::flatten::build;
use hwpx_babel::formats::markdown::{Inline, MarkdownDocument, MarkdownNode};
use hwpx_babel::ir::{BlockKind, Run, RunFormat, StyleRef, TableCellAlignment};
use hwpx_babel::ConversionOptions;

#[test]
fn test_headings_only() {
    let doc = model("# One\n## Two\n### Three\n#### Four\n##### Five\n###### Six\n");
    let styles: Vec<StyleRef> = doc.blocks.iter().map(|b| b.style).collect();
    assert_eq!(
        styles,
        vec![
            StyleRef::Heading1,
            StyleRef::Heading2,
            StyleRef::Heading3,
            StyleRef::Heading4,
            StyleRef::Heading5,
            StyleRef::Heading6,
        ]
    );
    let texts: Vec<String> = doc.blocks.iter().map(text_of).collect();
    assert_eq!(texts, vec!["One", "Two", "Three", "Four", "Five", "Six"]);
}

#[test]
fn test_indices_are_dense() {
    for (i, block) in PROPOSAL_MODEL.blocks.iter().enumerate() {
        assert_eq!(block.index, i);
    }
}

#[test]
fn test_empty_input_is_one_empty_paragraph() {
    let doc = model("");
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(doc.blocks[0].style, StyleRef::BodyText);
    assert!(is_empty_paragraph(&doc.blocks[0]));

    let whitespace = model("   \n\n\t\n");
    assert_eq!(whitespace, doc);
}

#[test]
fn test_contiguous_bold_is_one_run() {
    let doc = model("**bold across words**\n");
    let runs = doc.blocks[0].kind.runs();
    assert_eq!(runs.len(), 1);
    let run = runs[0].as_text().unwrap();
    assert_eq!(run.text, "bold across words");
    assert_eq!(run.format, RunFormat::plain().with_bold());
}

#[test]
fn test_runs_split_at_format_boundaries() {
    let doc = model("a **b *c*** d\n");
    let runs: Vec<(String, RunFormat)> = doc.blocks[0]
        .kind
        .runs()
        .iter()
        .filter_map(Run::as_text)
        .map(|run| (run.text.clone(), run.format))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("a ".to_string(), RunFormat::plain()),
            ("b ".to_string(), RunFormat::plain().with_bold()),
            ("c".to_string(), RunFormat::plain().with_bold().with_italic()),
            (" d".to_string(), RunFormat::plain()),
        ]
    );
}

#[test]
fn test_unmatched_asterisk_is_literal() {
    let doc = model("a *b");
    let runs = doc.blocks[0].kind.runs();
    assert_eq!(runs, &[Run::text("a *b", RunFormat::plain())]);
}

#[test]
fn test_links_keep_their_target() {
    let doc = model("go to [the site](https://example.com) now\n");
    let linked: Vec<_> = doc.blocks[0]
        .kind
        .runs()
        .iter()
        .filter_map(Run::as_text)
        .filter(|run| run.link.is_some())
        .collect();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].text, "the site");
    assert_eq!(linked[0].link.as_deref(), Some("https://example.com"));
}

#[test]
fn test_images_become_alt_text() {
    let doc = model("![매출 추이](chart.png) and ![](bare.png)\n");
    assert_eq!(text_of(&doc.blocks[0]), "매출 추이 and bare.png");
}

#[test]
fn test_rule_and_code_blocks() {
    let doc = model("before\n\n---\n\n```sh\nls\n\ncd /\n```\n");
    assert_eq!(doc.blocks[1].kind, BlockKind::Rule);
    assert_eq!(doc.blocks[1].style, StyleRef::BodyText);
    assert_eq!(doc.blocks[2].style, StyleRef::CodeText);
    assert_eq!(
        doc.blocks[2].kind,
        BlockKind::Code {
            language: Some("sh".to_string()),
            lines: vec!["ls".to_string(), String::new(), "cd /".to_string()],
        }
    );
}

#[test]
fn test_ragged_table_rows_are_padded() {
    let cell = |text: &str| vec![Inline::Text(text.to_string())];
    let doc = MarkdownDocument {
        blocks: vec![MarkdownNode::Table {
            alignments: vec![TableCellAlignment::Left, TableCellAlignment::Right],
            weights: None,
            rows: vec![
                vec![cell("a"), cell("b")],
                vec![cell("1"), cell("2"), cell("3")],
                vec![cell("x")],
            ],
        }],
        ..MarkdownDocument::default()
    };

    let model = build(&doc).unwrap();
    let BlockKind::Table(table) = &model.blocks[0].kind else {
        panic!("expected a table");
    };
    assert_eq!(model.blocks[0].style, StyleRef::TableCell);
    assert_eq!(table.columns, 3);
    assert_eq!(table.rows.len(), 3);
    assert!(table.rows.iter().all(|row| row.cells.len() == 3));
    assert_eq!(
        table.alignments,
        vec![
            TableCellAlignment::Left,
            TableCellAlignment::Right,
            TableCellAlignment::None
        ]
    );
}

#[test]
fn test_title_block_follows_option() {
    let source = "---\ntitle: Report\n---\n\n# Body\n";
    let with_title = model(source);
    assert_eq!(with_title.blocks[0].style, StyleRef::Title);
    assert_eq!(text_of(&with_title.blocks[0]), "Report");

    let options = ConversionOptions {
        emit_title_block: false,
        ..ConversionOptions::default()
    };
    let without = model_with(source, &options);
    assert_eq!(without.blocks[0].style, StyleRef::Heading1);
    assert_eq!(without.metadata.title.as_deref(), Some("Report"));
}

#[test]
fn test_page_breaks_can_be_disabled() {
    let options = ConversionOptions {
        page_break_before_h1: false,
        ..ConversionOptions::default()
    };
    let doc = model_with("# A\n\n# B\n", &options);
    assert!(doc.blocks.iter().all(|b| !b.page_break_before));
}

#[test]
fn test_proposal_shape() {
    let doc = &*PROPOSAL_MODEL;
    assert_eq!(doc.blocks[0].style, StyleRef::Title);
    assert_eq!(doc.metadata.author.as_deref(), Some("Kim"));

    let appendix = doc
        .blocks
        .iter()
        .find(|b| text_of(b) == "부록")
        .expect("appendix heading");
    assert!(appendix.page_break_before);
    assert_eq!(
        doc.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Table(_)))
            .count(),
        1
    );
}
