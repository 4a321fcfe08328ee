//! Conversion facade: markdown text in, HWPX bytes and a filename out.
//!
//! [`Converter`] runs the whole pipeline:
//!
//! ```text
//! text ──parse──▶ MarkdownDocument ──build──▶ DocumentModel
//!      ──serialize──▶ Vec<PackagePart> ──assemble──▶ zip bytes
//! ```
//!
//! Each call owns all of its intermediate state, so one `Converter` can be
//! shared across threads.

use std::fmt;
use std::sync::Arc;

use crate::common::flatten::build_with_resolver;
use crate::common::images::{ImageResolver, NoImages};
use crate::error::ConversionError;
use crate::formats::hwpx::{self, assemble, serialize_with_options, StyleCatalog};
use crate::formats::markdown::{parse_with_options, MarkdownDocument, ParseOptions};
use crate::ir::nodes::DocumentModel;
use crate::options::ConversionOptions;

const UTF8_BOM: &str = "\u{feff}";
const MAX_STEM_CHARS: usize = 120;

/// A finished HWPX document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub bytes: Vec<u8>,
    /// Suggested download name, always ending in `.hwpx`
    pub filename: String,
}

impl Conversion {
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.filename)
    }
}

#[derive(Clone, Default)]
pub struct Converter {
    options: ConversionOptions,
    images: Option<Arc<dyn ImageResolver>>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("embeds_images", &self.images.is_some())
            .finish()
    }
}

impl Converter {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            images: None,
        }
    }

    /// Embed pictures `resolver` can supply instead of keeping their alt text.
    pub fn with_image_resolver(mut self, resolver: impl ImageResolver + 'static) -> Self {
        self.images = Some(Arc::new(resolver));
        self
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert markdown text into an HWPX package.
    pub fn convert(&self, text: &str) -> Result<Conversion, ConversionError> {
        let model = self.document_model(text)?;
        let parts = serialize_with_options(&model, &self.options)?;
        let bytes = assemble(&parts)?;
        let filename = suggested_filename(
            model.metadata.title.as_deref(),
            &self.options.default_filename,
        );

        log::info!(
            "converted {} bytes of markdown into {filename} ({} bytes)",
            text.len(),
            bytes.len()
        );
        Ok(Conversion { bytes, filename })
    }

    /// Convert raw bytes, which must be UTF-8. A leading byte order mark is
    /// ignored.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Conversion, ConversionError> {
        self.check_size(bytes.len())?;
        let text = std::str::from_utf8(bytes)
            .map_err(|err| ConversionError::Input(format!("input is not valid UTF-8: {err}")))?;
        self.convert(text)
    }

    /// Parse without building, for inspection.
    pub fn parse(&self, text: &str) -> Result<MarkdownDocument, ConversionError> {
        self.check_size(text.len())?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
        let options = ParseOptions {
            max_nesting_depth: self.options.max_nesting_depth,
        };
        Ok(parse_with_options(text, &options))
    }

    pub fn document_model(&self, text: &str) -> Result<DocumentModel, ConversionError> {
        let doc = self.parse(text)?;
        let resolver: &dyn ImageResolver = match &self.images {
            Some(resolver) => resolver.as_ref(),
            None => &NoImages,
        };
        let model = build_with_resolver(&doc, &self.options, resolver)?;
        log::debug!(
            "built document model with {} blocks and {} images",
            model.blocks.len(),
            model.binaries.len()
        );
        Ok(model)
    }

    /// The style catalog the document resolves to.
    pub fn style_catalog(&self, text: &str) -> Result<StyleCatalog, ConversionError> {
        let model = self.document_model(text)?;
        hwpx::style_catalog(&model, &self.options)
    }

    fn check_size(&self, len: usize) -> Result<(), ConversionError> {
        let limit = self.options.max_input_bytes;
        if len > limit {
            log::info!("rejecting input of {len} bytes (limit {limit})");
            return Err(ConversionError::Input(format!(
                "input is {len} bytes, the limit is {limit}"
            )));
        }
        Ok(())
    }
}

/// Convert markdown text with default options.
pub fn convert(text: &str) -> Result<Conversion, ConversionError> {
    Converter::default().convert(text)
}

/// Filename for a document: the sanitized title plus `.hwpx`, or `fallback`
/// when there is no usable title.
pub fn suggested_filename(title: Option<&str>, fallback: &str) -> String {
    match title.map(sanitize_stem) {
        Some(stem) if !stem.is_empty() => format!("{stem}.hwpx"),
        _ => fallback.to_string(),
    }
}

fn sanitize_stem(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| {
            !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        })
        .collect();
    let stem = kept.split_whitespace().collect::<Vec<_>>().join("_");
    stem.trim_matches('.').chars().take(MAX_STEM_CHARS).collect()
}
