//! Pictures embedded through an image resolver.

use crate::common::{part, unzip};
use hwpx_babel::formats::hwpx::{verify::verify_package, CONTENT_PATH, SECTION_PATH};
use hwpx_babel::ir::{BlockKind, Run};
use hwpx_babel::{ConversionOptions, Converter, ImageResolver};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

struct InMemory(Vec<(&'static str, Vec<u8>)>);

impl ImageResolver for InMemory {
    fn resolve(&self, src: &str) -> Option<Vec<u8>> {
        self.0
            .iter()
            .find(|(name, _)| *name == src)
            .map(|(_, data)| data.clone())
    }
}

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut data = Vec::new();
    RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut data), format)
        .unwrap();
    data
}

fn converter() -> Converter {
    Converter::new(ConversionOptions::default()).with_image_resolver(InMemory(vec![
        ("chart.png", encoded(100, 50, ImageFormat::Png)),
        ("photo.jpg", encoded(800, 600, ImageFormat::Jpeg)),
    ]))
}

const SOURCE: &str = "# Pictures\n\n![chart](chart.png)\n\n![photo](photo.jpg) and ![chart again](chart.png)\n\n![missing](nowhere.png)\n";

#[test]
fn test_pictures_become_binary_items() {
    let model = converter().document_model(SOURCE).unwrap();
    let paths: Vec<_> = model.binaries.iter().map(|item| item.path()).collect();
    assert_eq!(paths, ["BinData/image1.png", "BinData/image2.jpg"]);

    let runs: Vec<&Run> = model
        .blocks
        .iter()
        .filter_map(|block| match &block.kind {
            BlockKind::Paragraph { runs } => Some(runs),
            _ => None,
        })
        .flatten()
        .collect();
    let pictures: Vec<_> = runs
        .iter()
        .filter_map(|run| match run {
            Run::Image(image) => Some(image.binary_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(pictures, ["image1", "image2", "image1"]);
    assert!(runs
        .iter()
        .any(|run| run.as_text().is_some_and(|text| text.text.contains("missing"))));
}

#[test]
fn test_wide_pictures_fit_the_text_width() {
    let model = converter().document_model(SOURCE).unwrap();
    let photo = model
        .blocks
        .iter()
        .filter_map(|block| match &block.kind {
            BlockKind::Paragraph { runs } => Some(runs),
            _ => None,
        })
        .flatten()
        .find_map(|run| match run {
            Run::Image(image) if image.binary_id == "image2" => Some(image.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(photo.width, 42520);
    assert_eq!(photo.height, 42520 * 600 / 800);
}

#[test]
fn test_package_lists_and_verifies_pictures() {
    let converter = converter();
    let model = converter.document_model(SOURCE).unwrap();
    let parts = hwpx_babel::formats::hwpx::serialize(&model).unwrap();
    verify_package(&parts).unwrap();

    let content = part(&parts, CONTENT_PATH);
    assert!(content.contains(r#"href="BinData/image2.jpg" media-type="image/jpeg" isEmbeded="1""#));
    let section = part(&parts, SECTION_PATH);
    assert_eq!(section.matches("<hp:pic ").count(), 3);

    let bytes = converter.convert(SOURCE).unwrap().bytes;
    let entries = unzip(&bytes);
    let png = entries
        .iter()
        .find(|entry| entry.name == "BinData/image1.png")
        .unwrap();
    assert!(png.stored);
    assert_eq!(image::guess_format(&png.contents).unwrap(), ImageFormat::Png);
}

#[test]
fn test_pictures_are_deterministic() {
    let first = converter().convert(SOURCE).unwrap().bytes;
    let second = converter().convert(SOURCE).unwrap().bytes;
    assert_eq!(first, second);
}

#[test]
fn test_without_a_resolver_pictures_keep_alt_text() {
    let model = Converter::new(ConversionOptions::default())
        .document_model(SOURCE)
        .unwrap();
    assert!(model.binaries.is_empty());
}
