//! Shared configuration loader for the md2hwpx toolchain.
//!
//! `defaults/hwpx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`HwpxConfig`],
//! which converts into the engine's [`ConversionOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use hwpx_babel::{
    ConversionOptions, FontOptions, LayoutOptions, PageMargins, PageSetup, UnsupportedPolicy,
};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/hwpx.default.toml");

/// Top-level configuration consumed by md2hwpx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct HwpxConfig {
    pub input: InputConfig,
    pub document: DocumentConfig,
    pub layout: LayoutConfig,
}

/// Limits and policies applied to the markdown source.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub max_bytes: usize,
    pub max_nesting_depth: usize,
    pub unsupported: UnsupportedMode,
    pub max_images: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedMode {
    Degrade,
    Reject,
}

impl From<UnsupportedMode> for UnsupportedPolicy {
    fn from(mode: UnsupportedMode) -> Self {
        match mode {
            UnsupportedMode::Degrade => UnsupportedPolicy::Degrade,
            UnsupportedMode::Reject => UnsupportedPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub page_break_before_h1: bool,
    pub emit_title_block: bool,
    pub default_filename: String,
    pub verify_package: bool,
}

/// Page layout and typography, lengths in HWPUNIT.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub table_width: u32,
    pub list_indent: u32,
    pub quote_indent: u32,
    pub link_color: String,
    pub image_max_width: u32,
    pub page: PageConfig,
    pub fonts: FontsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub width: u32,
    pub height: u32,
    pub orientation: String,
    pub gutter_type: String,
    pub margins: MarginsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MarginsConfig {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FontsConfig {
    pub body: String,
    pub heading: String,
    pub code: String,
}

impl From<&LayoutConfig> for LayoutOptions {
    fn from(config: &LayoutConfig) -> Self {
        LayoutOptions {
            table_width: config.table_width,
            list_indent: config.list_indent,
            quote_indent: config.quote_indent,
            link_color: config.link_color.clone(),
            image_max_width: config.image_max_width,
            page: PageSetup::from(&config.page),
            fonts: FontOptions {
                body: config.fonts.body.clone(),
                heading: config.fonts.heading.clone(),
                code: config.fonts.code.clone(),
            },
        }
    }
}

impl From<&PageConfig> for PageSetup {
    fn from(config: &PageConfig) -> Self {
        let margins = config.margins;
        PageSetup {
            width: config.width,
            height: config.height,
            orientation: config.orientation.clone(),
            gutter_type: config.gutter_type.clone(),
            margins: PageMargins {
                left: margins.left,
                right: margins.right,
                top: margins.top,
                bottom: margins.bottom,
                header: margins.header,
                footer: margins.footer,
                gutter: margins.gutter,
            },
        }
    }
}

impl From<&HwpxConfig> for ConversionOptions {
    fn from(config: &HwpxConfig) -> Self {
        ConversionOptions {
            max_input_bytes: config.input.max_bytes,
            max_nesting_depth: config.input.max_nesting_depth,
            unsupported: config.input.unsupported.into(),
            page_break_before_h1: config.document.page_break_before_h1,
            emit_title_block: config.document.emit_title_block,
            default_filename: config.document.default_filename.clone(),
            verify_package: config.document.verify_package,
            max_images: config.input.max_images,
            layout: LayoutOptions::from(&config.layout),
        }
    }
}

impl From<HwpxConfig> for ConversionOptions {
    fn from(config: HwpxConfig) -> Self {
        ConversionOptions::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HwpxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<HwpxConfig, ConfigError> {
    Loader::new().build()
}
