//! Rasteriser seam between the render worker and the PDF engine

use std::sync::Arc;

use image::RgbImage;

use super::request::{RenderParams, WorkerFault};

/// Largest edge of a rasterised page, in half-block pixels
pub const MAX_RASTER_DIMENSION: f32 = 4096.0;

/// Opens documents from memory. Shared across threads.
pub trait DocumentBackend: Send + Sync {
    fn open(&self, bytes: Arc<[u8]>) -> Result<Box<dyn OpenDocument>, WorkerFault>;
}

/// A document opened on the render worker thread
pub trait OpenDocument {
    fn page_count(&self) -> Result<usize, WorkerFault>;

    /// Page size in points (0-based index)
    fn page_size(&self, index: usize) -> Result<(f32, f32), WorkerFault>;

    /// Rasterise a page (0-based index) at the given magnification
    fn rasterize(&self, index: usize, mag: f32) -> Result<RgbImage, WorkerFault>;
}

/// Pre-computed rasterisation parameters for a page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterSpec {
    pub mag: f32,
    pub output_width: f32,
    pub output_height: f32,
}

impl RasterSpec {
    /// Fit the page into the viewport, then apply the user zoom.
    pub fn compute(page_size: (f32, f32), params: &RenderParams) -> Self {
        let (page_width, page_height) = page_size;
        let (view_width, view_height) = params.viewport.pixels();

        let base_mag = if page_width <= 0.0 || page_height <= 0.0 {
            1.0
        } else if page_width / page_height > view_width / view_height {
            view_width / page_width
        } else {
            view_height / page_height
        };

        let mut mag = base_mag * params.scale;
        let mut out_width = page_width * mag;
        let mut out_height = page_height * mag;

        let max_dim = out_width.max(out_height);
        if max_dim > MAX_RASTER_DIMENSION {
            let reduction = MAX_RASTER_DIMENSION / max_dim;
            mag *= reduction;
            out_width *= reduction;
            out_height *= reduction;
        }

        Self {
            mag,
            output_width: out_width.floor().max(1.0),
            output_height: out_height.floor().max(1.0),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use fake::FakeBackend;

#[cfg(any(test, feature = "test-utils"))]
mod fake {
    use std::sync::Arc;

    use image::{Rgb, RgbImage};

    use super::{DocumentBackend, OpenDocument};
    use crate::document::request::WorkerFault;

    /// Page size of every fake page, in points
    const FAKE_PAGE_SIZE: (f32, f32) = (100.0, 140.0);

    /// In-memory backend: every page is a flat colour keyed by its index.
    ///
    /// Documents whose bytes don't start with `%PDF` fail to open, so tests can
    /// exercise the error path with a plain text file.
    #[derive(Clone, Debug)]
    pub struct FakeBackend {
        page_count: usize,
    }

    impl FakeBackend {
        pub fn new(page_count: usize) -> Self {
            Self { page_count }
        }

        pub fn shade(index: usize) -> Rgb<u8> {
            let v = (index * 37 % 200) as u8 + 40;
            Rgb([v, 255 - v, 128])
        }
    }

    impl DocumentBackend for FakeBackend {
        fn open(&self, bytes: Arc<[u8]>) -> Result<Box<dyn OpenDocument>, WorkerFault> {
            if !bytes.starts_with(b"%PDF") {
                return Err(WorkerFault::generic("not a PDF document"));
            }
            Ok(Box::new(FakeDocument {
                page_count: self.page_count,
            }))
        }
    }

    struct FakeDocument {
        page_count: usize,
    }

    impl OpenDocument for FakeDocument {
        fn page_count(&self) -> Result<usize, WorkerFault> {
            Ok(self.page_count)
        }

        fn page_size(&self, index: usize) -> Result<(f32, f32), WorkerFault> {
            if index >= self.page_count {
                return Err(WorkerFault::generic(format!("page {index} out of range")));
            }
            Ok(FAKE_PAGE_SIZE)
        }

        fn rasterize(&self, index: usize, mag: f32) -> Result<RgbImage, WorkerFault> {
            let (w, h) = FAKE_PAGE_SIZE;
            let width = ((w * mag) as u32).max(1);
            let height = ((h * mag) as u32).max(1);
            Ok(RgbImage::from_pixel(width, height, FakeBackend::shade(index)))
        }
    }
}
