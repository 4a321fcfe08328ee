//! Inspect transforms
//!
//! Each transform renders one stage of the conversion pipeline:
//!
//! 1. **Parsing** - Markdown text → MarkdownDocument
//!    - `markdown-json`: the parsed tree as JSON
//!
//! 2. **Building** - MarkdownDocument → DocumentModel
//!    - `model-json`: the flat block list as JSON (default)
//!    - `preview-text`: the plain-text preview stored in the package
//!
//! 3. **Serializing** - DocumentModel → HWPX parts
//!    - `catalog-json`: char/para shapes and numberings the document resolves to
//!
//! Example: `md2hwpx inspect notes.md catalog-json`

use hwpx_babel::formats::hwpx::preview_text;
use hwpx_babel::Converter;

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] =
    &["markdown-json", "model-json", "catalog-json", "preview-text"];

pub const DEFAULT_TRANSFORM: &str = "model-json";

/// Execute a named transform on markdown source
///
/// # Returns
///
/// The rendered output, newline terminated, or an error message
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    converter: &Converter,
) -> Result<String, String> {
    let rendered = match transform_name {
        "markdown-json" => {
            let doc = converter.parse(source).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?
        }
        "model-json" => {
            let model = converter.document_model(source).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&model).map_err(|e| e.to_string())?
        }
        "catalog-json" => {
            let catalog = converter.style_catalog(source).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&catalog).map_err(|e| e.to_string())?
        }
        "preview-text" => {
            let model = converter.document_model(source).map_err(|e| e.to_string())?;
            preview_text(&model)
        }
        other => return Err(format!("Unknown transform '{other}'")),
    };
    Ok(format!("{rendered}\n"))
}
