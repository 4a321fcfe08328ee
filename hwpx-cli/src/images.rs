// Pictures read from disk for `![alt](src)`.
//
// Sources are looked up relative to the directory of the markdown file. Remote URLs, data URLs,
// absolute paths and anything that walks out of that directory (`..`, symlinks) are refused, and
// the picture keeps its alt text.

use hwpx_babel::ImageResolver;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Largest picture read from disk.
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct LocalImages {
    root: PathBuf,
}

impl LocalImages {
    /// Resolve pictures next to `input`.
    pub fn beside(input: &Path) -> Self {
        let base = input
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let root = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
        Self { root }
    }

    fn locate(&self, src: &str) -> Option<PathBuf> {
        if src.contains("://") || src.starts_with("data:") {
            log::warn!("not fetching remote image {src}, keeping its alt text");
            return None;
        }
        let relative = Path::new(src);
        if relative
            .components()
            .any(|part| !matches!(part, Component::Normal(_) | Component::CurDir))
        {
            log::warn!("image {src} is outside the input directory, keeping its alt text");
            return None;
        }

        let Ok(path) = self.root.join(relative).canonicalize() else {
            log::warn!("image {src} not found, keeping its alt text");
            return None;
        };
        if !path.starts_with(&self.root) {
            log::warn!("image {src} links outside the input directory, keeping its alt text");
            return None;
        }
        Some(path)
    }
}

impl ImageResolver for LocalImages {
    fn resolve(&self, src: &str) -> Option<Vec<u8>> {
        let path = self.locate(src)?;
        match fs::metadata(&path) {
            Ok(meta) if !meta.is_file() => {
                log::warn!("image {} is not a file", path.display());
                return None;
            }
            Ok(meta) if meta.len() > MAX_IMAGE_BYTES => {
                log::warn!(
                    "image {} is larger than {MAX_IMAGE_BYTES} bytes, keeping its alt text",
                    path.display()
                );
                return None;
            }
            _ => {}
        }
        fs::read(&path)
            .map_err(|err| log::warn!("reading image {}: {err}", path.display()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn images_in(dir: &TempDir) -> LocalImages {
        LocalImages::beside(&dir.path().join("doc.md"))
    }

    #[test]
    fn reads_pictures_next_to_the_input() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/a.png"), b"bytes").unwrap();

        let images = images_in(&dir);
        assert_eq!(images.resolve("img/a.png").as_deref(), Some(&b"bytes"[..]));
        assert_eq!(images.resolve("./img/a.png").as_deref(), Some(&b"bytes"[..]));
        assert!(images.resolve("img/missing.png").is_none());
    }

    #[test]
    fn refuses_sources_outside_the_input_directory() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.png"), b"bytes").unwrap();
        fs::create_dir(outer.path().join("docs")).unwrap();
        let images = LocalImages::beside(&outer.path().join("docs/doc.md"));

        assert!(images.resolve("../secret.png").is_none());
        let absolute = outer.path().join("secret.png");
        assert!(images.resolve(&absolute.to_string_lossy()).is_none());
        assert!(images.resolve("https://example.com/a.png").is_none());
        assert!(images.resolve("data:image/png;base64,AAAA").is_none());
    }

    #[test]
    fn directories_are_not_pictures() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        assert!(images_in(&dir).resolve("img").is_none());
    }
}
