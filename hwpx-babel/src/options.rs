//! Knobs that control a conversion.
//!
//! Defaults here match `hwpx-config`'s embedded defaults file, so library
//! callers that never touch configuration get the same output as the CLI.

/// What to do with markdown constructs the document model cannot represent
/// (raw HTML blocks and inline HTML).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
    /// Keep the raw source as plain text
    #[default]
    Degrade,
    /// Fail with [`ConversionError::UnsupportedConstruct`](crate::ConversionError)
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Inputs larger than this are rejected before parsing
    pub max_input_bytes: usize,
    /// Container and inline nesting beyond this depth is flattened to text
    pub max_nesting_depth: usize,
    pub unsupported: UnsupportedPolicy,
    /// Start every level-1 heading after the first content block on a new page
    pub page_break_before_h1: bool,
    /// Emit the front matter title as a leading Title paragraph
    pub emit_title_block: bool,
    /// Filename suggested when the document has no title
    pub default_filename: String,
    /// Re-parse emitted XML and cross-check every id reference
    pub verify_package: bool,
    /// Distinct pictures embedded per document; later ones keep their alt text
    pub max_images: usize,
    pub layout: LayoutOptions,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_nesting_depth: 20,
            unsupported: UnsupportedPolicy::Degrade,
            page_break_before_h1: true,
            emit_title_block: true,
            default_filename: "proposal.hwpx".to_string(),
            verify_package: true,
            max_images: 500,
            layout: LayoutOptions::default(),
        }
    }
}

/// Page geometry and typography, all lengths in HWPUNIT (1/7200 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub table_width: u32,
    pub list_indent: u32,
    pub quote_indent: u32,
    pub link_color: String,
    /// Wider pictures are scaled down to this width
    pub image_max_width: u32,
    pub page: PageSetup,
    pub fonts: FontOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            table_width: 42520,
            list_indent: 2000,
            quote_indent: 2000,
            link_color: "#0000FF".to_string(),
            image_max_width: 42520,
            page: PageSetup::default(),
            fonts: FontOptions::default(),
        }
    }
}

/// `hp:pagePr` of the section. Defaults to A4 portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    /// `WIDELY` (portrait) or `NARROWLY` (landscape)
    pub orientation: String,
    pub gutter_type: String,
    pub margins: PageMargins,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 59528,
            height: 84186,
            orientation: "WIDELY".to_string(),
            gutter_type: "LEFT_ONLY".to_string(),
            margins: PageMargins::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            left: 8504,
            right: 8504,
            top: 5668,
            bottom: 4252,
            header: 4252,
            footer: 4252,
            gutter: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontOptions {
    pub body: String,
    pub heading: String,
    pub code: String,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            body: "함초롬바탕".to_string(),
            heading: "함초롬돋움".to_string(),
            code: "D2Coding".to_string(),
        }
    }
}
