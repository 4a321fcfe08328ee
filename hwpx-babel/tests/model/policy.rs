//! Unsupported construct policy.

use crate::common::{model, model_with, text_of};
use hwpx_babel::{parse, to_model, ConversionError, ConversionOptions, UnsupportedPolicy};

fn strict() -> ConversionOptions {
    ConversionOptions {
        unsupported: UnsupportedPolicy::Reject,
        ..ConversionOptions::default()
    }
}

#[test]
fn test_strict_rejects_html_blocks_and_inline_html() {
    let source = "# Title\n\n<div>\nboxed\n</div>\n\nsee <b>this</b>\n";
    let err = to_model(&parse(source), &strict()).unwrap_err();
    let ConversionError::UnsupportedConstruct(constructs) = &err else {
        panic!("expected unsupported construct error, got {err:?}");
    };

    assert_eq!(constructs[0].kind, "raw HTML block");
    assert_eq!(constructs[0].line, Some(3));
    assert_eq!(
        constructs
            .iter()
            .filter(|c| c.kind == "inline HTML")
            .count(),
        2
    );
    assert!(err.is_user_actionable());
}

#[test]
fn test_degrade_keeps_the_raw_text() {
    let doc = model("<div>\nboxed\n</div>\n");
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(text_of(&doc.blocks[0]), "<div>boxed</div>");

    let inline = model("see <b>this</b>\n");
    assert_eq!(text_of(&inline.blocks[0]), "see <b>this</b>");
}

#[test]
fn test_strict_accepts_plain_markdown() {
    let doc = model_with("# Fine\n\n**no html here**\n", &strict());
    assert_eq!(doc.blocks.len(), 2);
}
