//! HWPX format implementation
//!
//! This module implements HWPX export: [`DocumentModel`] → package parts → zip.
//!
//! # The HWPX Package
//!
//! An HWPX file is an OCF container (the same zip-of-XML layout EPUB and ODF
//! use) holding OWPML parts:
//!
//! ```text
//! mimetype                    application/hwp+zip, stored, always first
//! version.xml                 format version record
//! Contents/header.xml         fonts, char/para properties, numberings, styles
//! Contents/section0.xml       the body: hp:p paragraphs, runs, tables
//! Preview/PrvText.txt         plain-text preview
//! settings.xml                caret position
//! Contents/content.hpf        OPF package: metadata, manifest, spine
//! META-INF/container.xml      points readers at content.hpf
//! META-INF/manifest.xml
//! BinData/imageN.<ext>        embedded pictures, when the document has any
//! ```
//!
//! # Serialization Order
//!
//! The section is written before the header. Paragraphs and runs reference
//! header properties by id, and formatting variants are only known once the
//! body has been walked, so the section fills a [`StyleCatalog`] that the
//! header is then rendered from.
//!
//! # Library Choice
//!
//! - `quick-xml` writes every XML part, so escaping is never done by hand
//! - `roxmltree` re-reads the output for [`verify`]
//! - `zip` assembles the container in [`package`] and reads reference
//!   documents in [`reference`]

pub mod catalog;
mod header;
mod manifest;
pub mod package;
pub mod reference;
mod section;
pub mod verify;
mod xml;

use crate::error::ConversionError;
use crate::ir::nodes::{BinaryItem, DocumentModel};
use crate::options::ConversionOptions;

pub use catalog::StyleCatalog;
pub use manifest::{preview_text, PREVIEW_LIMIT};
pub use package::assemble;
pub use reference::ReferenceDocument;

/// Content of the `mimetype` entry.
pub const MIMETYPE: &str = "application/hwp+zip";

pub const MIMETYPE_PATH: &str = "mimetype";
pub const VERSION_PATH: &str = "version.xml";
pub const HEADER_PATH: &str = "Contents/header.xml";
pub const SECTION_PATH: &str = "Contents/section0.xml";
pub const PREVIEW_PATH: &str = "Preview/PrvText.txt";
pub const SETTINGS_PATH: &str = "settings.xml";
pub const CONTENT_PATH: &str = "Contents/content.hpf";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const MANIFEST_PATH: &str = "META-INF/manifest.xml";

/// Every fixed part path, in package order. Binary items follow them.
pub const PART_PATHS: [&str; 9] = [
    MIMETYPE_PATH,
    VERSION_PATH,
    HEADER_PATH,
    SECTION_PATH,
    PREVIEW_PATH,
    SETTINGS_PATH,
    CONTENT_PATH,
    CONTAINER_PATH,
    MANIFEST_PATH,
];

pub(crate) const NS_HEAD: &str = "http://www.hancom.co.kr/hwpml/2011/head";
pub(crate) const NS_PARAGRAPH: &str = "http://www.hancom.co.kr/hwpml/2011/paragraph";
pub(crate) const NS_SECTION: &str = "http://www.hancom.co.kr/hwpml/2011/section";
pub(crate) const NS_CORE: &str = "http://www.hancom.co.kr/hwpml/2011/core";
pub(crate) const NS_APP: &str = "http://www.hancom.co.kr/hwpml/2011/app";
pub(crate) const NS_VERSION: &str = "http://www.hancom.co.kr/hwpml/2011/version";
pub(crate) const NS_OPF: &str = "http://www.idpf.org/2007/opf/";
pub(crate) const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const NS_CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
pub(crate) const NS_MANIFEST: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";
pub(crate) const NS_HPF: &str = "http://www.hancom.co.kr/schema/2011/hpf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartCompression {
    Stored,
    Deflated,
}

/// One named entry of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePart {
    pub path: String,
    pub media_type: &'static str,
    pub payload: Vec<u8>,
    pub compression: PartCompression,
}

impl PackagePart {
    fn deflated(path: &str, media_type: &'static str, payload: Vec<u8>) -> Self {
        Self {
            path: path.to_string(),
            media_type,
            payload,
            compression: PartCompression::Deflated,
        }
    }

    /// PNG, JPEG and GIF data is already compressed and is stored as is.
    fn binary(item: &BinaryItem) -> Self {
        let compression = match item.extension {
            "bmp" => PartCompression::Deflated,
            _ => PartCompression::Stored,
        };
        Self {
            path: item.path(),
            media_type: item.media_type,
            payload: item.data.clone(),
            compression,
        }
    }
}

/// Serialize a document model with default options.
pub fn serialize(model: &DocumentModel) -> Result<Vec<PackagePart>, ConversionError> {
    serialize_with_options(model, &ConversionOptions::default())
}

/// Serialize a document model into the ordered list of package parts.
pub fn serialize_with_options(
    model: &DocumentModel,
    options: &ConversionOptions,
) -> Result<Vec<PackagePart>, ConversionError> {
    let layout = &options.layout;
    let mut catalog = StyleCatalog::new();
    let section = section::write_section(model, &mut catalog, layout)?;
    let header = header::write_header(&catalog, layout)?;

    log::debug!(
        "serialized {} blocks: {} charPr, {} paraPr, {} numberings",
        model.blocks.len(),
        catalog.char_shapes().len(),
        catalog.para_shapes().len(),
        catalog.numberings().len()
    );

    let mut parts = vec![
        PackagePart {
            path: MIMETYPE_PATH.to_string(),
            media_type: "text/plain",
            payload: MIMETYPE.as_bytes().to_vec(),
            compression: PartCompression::Stored,
        },
        PackagePart::deflated(VERSION_PATH, "application/xml", manifest::version_xml()?),
        PackagePart::deflated(HEADER_PATH, "application/xml", header),
        PackagePart::deflated(SECTION_PATH, "application/xml", section),
        PackagePart::deflated(
            PREVIEW_PATH,
            "text/plain",
            preview_text(model).into_bytes(),
        ),
        PackagePart::deflated(SETTINGS_PATH, "application/xml", manifest::settings_xml()?),
        PackagePart::deflated(
            CONTENT_PATH,
            "application/hwpml-package+xml",
            manifest::content_hpf(&model.metadata, &model.binaries)?,
        ),
        PackagePart::deflated(CONTAINER_PATH, "application/xml", manifest::container_xml()?),
        PackagePart::deflated(MANIFEST_PATH, "application/xml", manifest::manifest_xml()?),
    ];
    parts.extend(model.binaries.iter().map(PackagePart::binary));

    if options.verify_package {
        verify::verify_package(&parts)?;
    }
    Ok(parts)
}

/// The catalog a model resolves to, for inspection.
pub fn style_catalog(
    model: &DocumentModel,
    options: &ConversionOptions,
) -> Result<StyleCatalog, ConversionError> {
    let mut catalog = StyleCatalog::new();
    section::write_section(model, &mut catalog, &options.layout)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::flatten::build;
    use crate::formats::markdown::parse;

    #[test]
    fn parts_follow_package_order() {
        let parts = serialize(&build(&parse("# x\n")).unwrap()).unwrap();
        let paths: Vec<&str> = parts.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, PART_PATHS.to_vec());
        assert_eq!(parts[0].compression, PartCompression::Stored);
        assert!(parts[1..]
            .iter()
            .all(|p| p.compression == PartCompression::Deflated));
    }

    #[test]
    fn catalog_grows_with_variants() {
        let model = build(&parse("plain *it* **b**\n")).unwrap();
        let catalog = style_catalog(&model, &ConversionOptions::default()).unwrap();
        assert_eq!(catalog.char_shapes().len(), 11 + 2);
    }
}
