//! Resource loading for `url()` values: read, detect the format, decode.
//!
//! Raster formats (PNG, JPEG, GIF, …) decode through the `image` crate;
//! SVG parses with usvg and rasterizes with resvg at its natural size.
//! Every image ends up as a premultiplied `Argb32` [`Surface`].

use std::fs;
use std::path::{Path, PathBuf};

use glaze_common::warning::warn_once;
use glaze_css::{ImageLoader, Surface};
use thiserror::Error;

/// Why an image could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that was tried.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A raster image failed to decode.
    #[error("could not decode image: {0}")]
    Raster(#[from] image::ImageError),
    /// An SVG document failed to parse.
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),
    /// A font file failed to parse.
    #[error("failed to parse font: {0}")]
    Font(&'static str),
    /// The image has no pixels.
    #[error("image has zero-size dimensions")]
    Empty,
    /// The URL scheme is not a local file.
    #[error("unsupported URL '{0}'")]
    UnsupportedUrl(String),
}

/// Detected image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image.
    Svg,
    /// Anything the `image` crate understands.
    Raster,
}

/// Guess the format from the file extension, then from the first bytes.
#[must_use]
pub fn detect_format(path: &Path, bytes: &[u8]) -> ImageFormat {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }
    let head: Vec<u8> = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect();
    if head.starts_with(b"<?xml") || head.starts_with(b"<svg") {
        ImageFormat::Svg
    } else {
        ImageFormat::Raster
    }
}

/// Decode image bytes.
///
/// # Errors
///
/// Returns a [`LoadError`] when the bytes are not a valid image of
/// `format` or the image is empty.
pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Surface, LoadError> {
    match format {
        ImageFormat::Svg => decode_svg(bytes),
        ImageFormat::Raster => decode_raster(bytes),
    }
}

fn decode_raster(bytes: &[u8]) -> Result<Surface, LoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::Empty);
    }
    Surface::from_straight_rgba(width as usize, height as usize, rgba.as_raw()).ok_or(LoadError::Empty)
}

fn decode_svg(bytes: &[u8]) -> Result<Surface, LoadError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(LoadError::Empty)?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Surface::from_premultiplied(size.width() as usize, size.height() as usize, pixmap.take()).ok_or(LoadError::Empty)
}

/// Load an image file.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or decoded.
pub fn load_file(path: &Path) -> Result<Surface, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes, detect_format(path, &bytes))
}

/// Resolves `url()` references against a base directory on disk.
///
/// Plain relative and absolute paths and `file://` URLs are supported.
/// Failures are reported once through the warning system and yield no
/// image, which the style treats as `none`.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    base: PathBuf,
}

impl FileImageLoader {
    /// Resolve relative URLs against `base`, usually the stylesheet's
    /// directory.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The file a URL refers to.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedUrl`] for non-file schemes.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, LoadError> {
        let path = if let Some(rest) = url.strip_prefix("file://") {
            rest
        } else if url.contains("://") || url.starts_with("data:") {
            return Err(LoadError::UnsupportedUrl(url.to_owned()));
        } else {
            url
        };
        // Fragments and queries never name part of a local file.
        let path = path.split(['#', '?']).next().unwrap_or(path);
        Ok(self.base.join(path))
    }

    /// Load the image `url` refers to.
    ///
    /// # Errors
    ///
    /// See [`FileImageLoader::resolve`] and [`load_file`].
    pub fn try_load(&self, url: &str) -> Result<Surface, LoadError> {
        load_file(&self.resolve(url)?)
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, url: &str) -> Option<Surface> {
        self.try_load(url)
            .inspect_err(|e| warn_once("image", &format!("cannot load '{url}': {e}")))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="3">
        <rect width="4" height="3" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_detect_by_extension_and_content() {
        assert_eq!(detect_format(Path::new("a.SVG"), b""), ImageFormat::Svg);
        assert_eq!(detect_format(Path::new("a"), b"  <svg>"), ImageFormat::Svg);
        assert_eq!(detect_format(Path::new("a"), b"<?xml version"), ImageFormat::Svg);
        assert_eq!(detect_format(Path::new("a.png"), b"\x89PNG"), ImageFormat::Raster);
    }

    #[test]
    fn test_decode_svg() {
        let surface = decode(SQUARE_SVG, ImageFormat::Svg).unwrap();
        assert_eq!((surface.width(), surface.height()), (4, 3));
        assert_eq!(surface.pixel(1, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode(b"not an image", ImageFormat::Raster), Err(LoadError::Raster(_))));
        assert!(matches!(decode(b"<svg", ImageFormat::Svg), Err(LoadError::Svg(_))));
    }

    #[test]
    fn test_resolve_urls() {
        let loader = FileImageLoader::new("/themes/dark");
        assert_eq!(loader.resolve("check.png").unwrap(), Path::new("/themes/dark/check.png"));
        assert_eq!(loader.resolve("file:///icons/a.svg#x").unwrap(), Path::new("/icons/a.svg"));
        assert!(matches!(
            loader.resolve("https://example.com/a.png"),
            Err(LoadError::UnsupportedUrl(_))
        ));
    }

    #[test]
    fn test_missing_file_is_none() {
        let loader = FileImageLoader::new("/nonexistent-glaze-dir");
        assert!(matches!(loader.try_load("a.png"), Err(LoadError::Io { .. })));
        assert!(loader.load("a.png").is_none());
    }
}
