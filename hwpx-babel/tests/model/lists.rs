//! List flattening.

use crate::common::{model, text_of, PROPOSAL_MODEL};
use hwpx_babel::ir::{Block, BlockKind, ListKind, ListMarker, StyleRef};

fn marker(block: &Block) -> Option<ListMarker> {
    match &block.kind {
        BlockKind::ListItem { marker, .. } => *marker,
        _ => None,
    }
}

#[test]
fn test_nested_ordered_list_goes_one_level_deeper() {
    let doc = model("- parent\n  1. first\n  2. second\n");
    assert_eq!(doc.blocks.len(), 3);
    assert!(doc.blocks.iter().all(|b| b.style == StyleRef::ListText));

    let depths: Vec<usize> = doc.blocks.iter().map(|b| b.depth).collect();
    assert_eq!(depths, vec![0, 1, 1]);

    let kinds: Vec<ListKind> = doc
        .blocks
        .iter()
        .filter_map(marker)
        .map(|m| m.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ListKind::Bullet,
            ListKind::Ordered { start: 1 },
            ListKind::Ordered { start: 1 }
        ]
    );
}

#[test]
fn test_list_ids_are_dense_in_document_order() {
    let doc = model("- a\n  - b\n- c\n\ntext\n\n1. d\n");
    let ids: Vec<usize> = doc.blocks.iter().filter_map(marker).map(|m| m.list_id).collect();
    assert_eq!(ids, vec![0, 1, 0, 2]);
}

#[test]
fn test_deep_nesting_keeps_counting_levels() {
    let mut source = String::new();
    for level in 0..5 {
        source.push_str(&"  ".repeat(level));
        source.push_str("- level\n");
    }
    let doc = model(&source);
    let depths: Vec<usize> = doc.blocks.iter().map(|b| b.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_task_items_are_prefixed() {
    let doc = model("- [x] done\n- [ ] open\n");
    let texts: Vec<String> = doc.blocks.iter().map(text_of).collect();
    assert_eq!(texts, vec!["☑ done", "☐ open"]);
}

#[test]
fn test_code_in_list_keeps_code_style() {
    let doc = model("- run this:\n\n  ```\n  make\n  ```\n- done\n");
    let styles: Vec<StyleRef> = doc.blocks.iter().map(|b| b.style).collect();
    assert_eq!(
        styles,
        vec![StyleRef::ListText, StyleRef::CodeText, StyleRef::ListText]
    );
}

#[test]
fn test_lists_inside_quotes_carry_both_levels() {
    let doc = model("> - quoted item\n");
    assert_eq!(doc.blocks[0].style, StyleRef::ListText);
    assert_eq!(doc.blocks[0].quote_level, 1);
    assert_eq!(doc.blocks[0].depth, 0);
}

#[test]
fn test_proposal_lists() {
    let items: Vec<(String, usize)> = PROPOSAL_MODEL
        .blocks
        .iter()
        .filter(|b| b.style == StyleRef::ListText)
        .map(|b| (text_of(b), b.depth))
        .collect();
    assert_eq!(
        items,
        vec![
            ("매출 확대".to_string(), 0),
            ("신규 고객 확보".to_string(), 0),
            ("국내".to_string(), 1),
            ("해외".to_string(), 1),
            ("☑ 예산 확정".to_string(), 0),
            ("☐ 인력 배치".to_string(), 0),
        ]
    );
}
