//! Core types for the document view

use std::io;
use std::path::Path;
use std::sync::{Arc, Weak};

use image::RgbImage;
use log::debug;

/// An in-memory document owned for the lifetime of a review.
///
/// The bytes are released when the source is dropped: on replacement during
/// ingestion, on removal, or when the review session is reset. The render
/// worker only borrows a clone of the `Arc` while it opens the document.
pub struct DocumentSource {
    name: String,
    bytes: Arc<[u8]>,
}

impl DocumentSource {
    /// Read a document from disk into memory
    pub fn open(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        debug!("Acquired document {name} ({} bytes)", bytes.len());
        Ok(Self {
            name,
            bytes: bytes.into(),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the bytes for the render worker
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Weak handle that stops upgrading once the document is released
    pub fn watch(&self) -> Weak<[u8]> {
        Arc::downgrade(&self.bytes)
    }
}

impl Drop for DocumentSource {
    fn drop(&mut self) {
        debug!("Released document {}", self.name);
    }
}

impl std::fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSource")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A rasterised page ready to be drawn with half-block cells.
///
/// Each terminal cell shows two vertically stacked pixels, so the image is
/// `width` columns by `height / 2` rows.
#[derive(Clone)]
pub struct PageImage {
    /// Page number (1-based)
    pub page: usize,
    /// Zoom factor the page was rendered with
    pub scale: f32,
    pub pixels: RgbImage,
}

impl PageImage {
    pub fn width_cells(&self) -> u16 {
        self.pixels.width().min(u32::from(u16::MAX)) as u16
    }

    pub fn height_cells(&self) -> u16 {
        self.pixels.height().div_ceil(2).min(u32::from(u16::MAX)) as u16
    }
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("page", &self.page)
            .field("scale", &self.scale)
            .field("width_px", &self.pixels.width())
            .field("height_px", &self.pixels.height())
            .finish_non_exhaustive()
    }
}

/// Viewport size in terminal cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn from_rect(r: ratatui::layout::Rect) -> Self {
        Self::new(r.width, r.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size in half-block pixels
    pub fn pixels(&self) -> (f32, f32) {
        (f32::from(self.width), f32::from(self.height) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_source_releases_bytes() {
        let source = DocumentSource::from_bytes("claim.pdf", b"%PDF-1.7".to_vec());
        let watch = source.watch();
        assert!(watch.upgrade().is_some());
        drop(source);
        assert!(watch.upgrade().is_none());
    }

    #[test]
    fn page_image_rows_round_up() {
        let img = PageImage {
            page: 1,
            scale: 1.0,
            pixels: RgbImage::new(10, 5),
        };
        assert_eq!(img.width_cells(), 10);
        assert_eq!(img.height_cells(), 3);
    }
}
