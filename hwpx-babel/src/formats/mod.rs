//! Format implementations
//!
//! This module contains the two ends of the pipeline: markdown on the way in
//! and HWPX on the way out.

pub mod hwpx;
pub mod markdown;

pub use hwpx::{serialize, serialize_with_options, PackagePart, PartCompression, StyleCatalog};
pub use markdown::{parse, parse_with_options, MarkdownDocument, ParseOptions};
