//! Pictures referenced from markdown.
//!
//! The engine never touches the file system. Callers that want pictures
//! embedded give the [`Converter`](crate::Converter) an [`ImageResolver`],
//! and every `![alt](src)` is looked up through it once per distinct `src`.
//! The bytes that come back are sniffed for their format and pixel size and
//! stored as a [`BinaryItem`]. A picture that cannot be resolved, is not a
//! format HWPX can show, or is over the per-document limit keeps its alt text.

use std::collections::HashMap;
use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::ir::nodes::{BinaryItem, ImageRun};
use crate::options::ConversionOptions;

/// HWPUNIT per pixel at 96 dpi.
const HWPUNIT_PER_PX: u32 = 75;
/// Width and height used when a picture's dimensions cannot be read.
const FALLBACK_SIZE: u32 = 8504;

/// Source of picture bytes.
pub trait ImageResolver: Send + Sync {
    /// Bytes of the picture `src` refers to, or `None` when it is unavailable.
    fn resolve(&self, src: &str) -> Option<Vec<u8>>;
}

/// Resolves nothing, so every picture keeps its alt text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _src: &str) -> Option<Vec<u8>> {
        None
    }
}

#[derive(Debug, Clone)]
struct Placed {
    id: String,
    width: u32,
    height: u32,
}

/// Binary items collected while building one document.
pub(crate) struct ImageTable<'r> {
    resolver: &'r dyn ImageResolver,
    limit: usize,
    max_width: u32,
    items: Vec<BinaryItem>,
    /// Every lookup made so far, misses included
    seen: HashMap<String, Option<Placed>>,
}

impl<'r> ImageTable<'r> {
    pub(crate) fn new(resolver: &'r dyn ImageResolver, options: &ConversionOptions) -> Self {
        Self {
            resolver,
            limit: options.max_images,
            max_width: options.layout.image_max_width,
            items: Vec::new(),
            seen: HashMap::new(),
        }
    }

    /// The picture run for `src`, or `None` when it stays text.
    pub(crate) fn embed(&mut self, src: &str, alt: &str) -> Option<ImageRun> {
        if !self.seen.contains_key(src) {
            let placed = self.load(src);
            self.seen.insert(src.to_string(), placed);
        }
        let placed = self.seen.get(src)?.as_ref()?;
        Some(ImageRun {
            binary_id: placed.id.clone(),
            width: placed.width,
            height: placed.height,
            alt: alt.to_string(),
        })
    }

    pub(crate) fn into_items(self) -> Vec<BinaryItem> {
        self.items
    }

    fn load(&mut self, src: &str) -> Option<Placed> {
        if self.items.len() >= self.limit {
            log::warn!(
                "image limit of {} reached, keeping the alt text of {src}",
                self.limit
            );
            return None;
        }
        let Some(data) = self.resolver.resolve(src) else {
            log::debug!("no image data for {src}");
            return None;
        };
        let Some((extension, media_type, format)) = sniff(&data) else {
            log::warn!("{src} is not a PNG, JPEG, GIF or BMP image, keeping its alt text");
            return None;
        };

        let (width, height) = fit_width(pixel_size(&data, format, src), self.max_width);
        let id = format!("image{}", self.items.len() + 1);
        log::debug!("embedding {src} as {id}.{extension} ({width}x{height})");
        self.items.push(BinaryItem {
            id: id.clone(),
            extension,
            media_type,
            data,
        });
        Some(Placed { id, width, height })
    }
}

fn sniff(data: &[u8]) -> Option<(&'static str, &'static str, ImageFormat)> {
    let format = image::guess_format(data).ok()?;
    let (extension, media_type) = match format {
        ImageFormat::Png => ("png", "image/png"),
        ImageFormat::Jpeg => ("jpg", "image/jpeg"),
        ImageFormat::Gif => ("gif", "image/gif"),
        ImageFormat::Bmp => ("bmp", "image/bmp"),
        _ => return None,
    };
    Some((extension, media_type, format))
}

/// Natural size in HWPUNIT, from the picture's pixel dimensions.
fn pixel_size(data: &[u8], format: ImageFormat, src: &str) -> (u32, u32) {
    match ImageReader::with_format(Cursor::new(data), format).into_dimensions() {
        Ok((width, height)) if width > 0 && height > 0 => (
            width.saturating_mul(HWPUNIT_PER_PX),
            height.saturating_mul(HWPUNIT_PER_PX),
        ),
        _ => {
            log::warn!("could not read the size of {src}, using {FALLBACK_SIZE}x{FALLBACK_SIZE}");
            (FALLBACK_SIZE, FALLBACK_SIZE)
        }
    }
}

/// Scale down to `max_width`, keeping the aspect ratio.
fn fit_width((width, height): (u32, u32), max_width: u32) -> (u32, u32) {
    if max_width == 0 || width <= max_width {
        return (width, height);
    }
    let scaled = u64::from(height) * u64::from(max_width) / u64::from(width);
    (max_width, u32::try_from(scaled).unwrap_or(u32::MAX).max(1))
}
