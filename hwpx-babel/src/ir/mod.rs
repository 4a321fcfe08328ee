//! Intermediate representation between the markdown AST and HWPX.
//!
//! This module defines a renderer-agnostic document model: blocks carry a
//! resolved style, their list/quote nesting and already-merged inline runs, so
//! the serializer never needs to look back at markdown.

pub mod nodes;

pub use nodes::{
    BinaryItem, Block, BlockKind, DocumentModel, ImageRun, ListKind, ListMarker, Metadata, Run,
    RunFormat, StyleRef, Table, TableCellAlignment, TableRow, TextRun,
};
