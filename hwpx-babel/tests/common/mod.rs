//! Shared fixtures and helpers for the integration tests.

use hwpx_babel::formats::hwpx::{serialize, PackagePart};
use hwpx_babel::ir::{Block, BlockKind, Run};
use hwpx_babel::{parse, to_model, ConversionOptions, DocumentModel};
use once_cell::sync::Lazy;
use std::io::{Cursor, Read};

/// A proposal-shaped document touching every block kind.
pub const PROPOSAL: &str = r#"---
title: "2025 사업 계획서"
author: Kim
date: 2025-01-15
---

# 개요

본 문서는 **핵심 목표**와 *추진 일정*을 정리한다. 자세한 내용은
[사업 안내](https://example.com/plan?id=1&lang=ko)를 참고한다.

## 목표

1. 매출 확대
2. 신규 고객 확보
   - 국내
   - 해외

- [x] 예산 확정
- [ ] 인력 배치

> 인용문 단락
>
> > 중첩 인용

| 항목 | 금액 | 비고 |
|:-----|-----:|:----:|
| 인건비 | 1,000 | 확정 |
| 장비 | 500 |

```rust
fn main() {
    println!("hi");
}
```

---

# 부록

끝.
"#;

pub static PROPOSAL_MODEL: Lazy<DocumentModel> = Lazy::new(|| model(PROPOSAL));

pub static PROPOSAL_PARTS: Lazy<Vec<PackagePart>> =
    Lazy::new(|| serialize(&PROPOSAL_MODEL).expect("proposal serializes"));

pub fn model(source: &str) -> DocumentModel {
    model_with(source, &ConversionOptions::default())
}

pub fn model_with(source: &str, options: &ConversionOptions) -> DocumentModel {
    to_model(&parse(source), options).expect("model builds")
}

/// Concatenated text of a block's runs.
pub fn text_of(block: &Block) -> String {
    block
        .kind
        .runs()
        .iter()
        .filter_map(Run::as_text)
        .map(|run| run.text.as_str())
        .collect()
}

pub fn is_empty_paragraph(block: &Block) -> bool {
    matches!(&block.kind, BlockKind::Paragraph { runs } if runs.is_empty())
}

pub fn part<'a>(parts: &'a [PackagePart], path: &str) -> &'a str {
    let part = parts
        .iter()
        .find(|p| p.path == path)
        .unwrap_or_else(|| panic!("missing part {path}"));
    std::str::from_utf8(&part.payload).expect("part is UTF-8")
}

/// An unpacked zip entry.
pub struct Entry {
    pub name: String,
    pub stored: bool,
    pub contents: Vec<u8>,
}

pub fn unzip(bytes: &[u8]) -> Vec<Entry> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("entry");
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).expect("entry readable");
            Entry {
                name: file.name().to_string(),
                stored: file.compression() == zip::CompressionMethod::Stored,
                contents,
            }
        })
        .collect()
}
