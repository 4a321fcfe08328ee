//! Markdown to HWPX conversion
//!
//!     This crate turns a markdown document into an HWPX file, the zip-of-XML word processor
//!     format read by Hancom Office (한글). It is the engine behind the md2hwpx CLI.
//!
//!     TLDR:
//!         - `convert(text)` gives you the `.hwpx` bytes and a suggested filename.
//!         - Parsing is delegated to comrak; we never hand-parse markdown.
//!         - Every XML part is written with quick-xml and re-checked with roxmltree before
//!           it is zipped.
//!
//! Architecture
//!
//!     Conversion runs in four stages, each a plain function over owned data:
//!
//!     1. Parse (./formats/markdown): text → MarkdownDocument, a small tree covering the
//!        markdown we support. Never fails.
//!     2. Build (./common/flatten.rs): MarkdownDocument → DocumentModel (./ir), a flat list
//!        of styled blocks. Nesting becomes depth / quote level numbers, as HWPX expects.
//!     3. Serialize (./formats/hwpx): DocumentModel → ordered package parts. The section is
//!        rendered first and fills a StyleCatalog, then the header is rendered from it.
//!     4. Assemble (./formats/hwpx/package.rs): parts → zip bytes, mimetype first and stored.
//!
//!     This is a pure lib: no file system access, no environment, no global state. The CLI
//!     (hwpx-cli) does the I/O and configuration (hwpx-config). Pictures come in through an
//!     ImageResolver the caller hands to the Converter, and a reference document is read
//!     from bytes the caller loaded.
//!
//!     The file structure :
//!     .
//!     ├── convert.rs              # Converter facade
//!     ├── error.rs
//!     ├── options.rs              # ConversionOptions
//!     ├── formats
//!     │   ├── markdown            # comrak → MarkdownDocument
//!     │   └── hwpx                # DocumentModel → parts → zip
//!     ├── ir                      # DocumentModel
//!     ├── common                  # tree → flat model mapping, picture table
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <stage>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     included from tests/lib.rs.
//!
//! Determinism
//!
//!     Ids (paragraphs, tables, hyperlink fields, catalog entries) come from per-call counters
//!     and zip entries carry a fixed timestamp, so the same input always produces the same bytes.
//!
pub mod common;
pub mod convert;
pub mod error;
pub mod formats;
pub mod ir;
pub mod options;

pub use common::images::{ImageResolver, NoImages};
pub use convert::{convert, suggested_filename, Conversion, Converter};
pub use error::{ConversionError, ErrorCategory, UnsupportedConstruct};
pub use formats::hwpx::{PackagePart, PartCompression, ReferenceDocument, StyleCatalog};
pub use formats::markdown::{parse, MarkdownDocument};
pub use ir::nodes::DocumentModel;
pub use options::{
    ConversionOptions, FontOptions, LayoutOptions, PageMargins, PageSetup, UnsupportedPolicy,
};

/// Lowers a parsed markdown document into the document model.
///
/// Fails only when the strict policy rejects unsupported constructs.
pub fn to_model(
    doc: &MarkdownDocument,
    options: &ConversionOptions,
) -> Result<DocumentModel, ConversionError> {
    common::flatten::build_with_options(doc, options)
}
