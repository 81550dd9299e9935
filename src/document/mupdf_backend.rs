//! MuPDF rasteriser

use std::sync::Arc;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::backend::{DocumentBackend, OpenDocument};
use super::request::WorkerFault;

const PDF_MAGIC: &str = "application/pdf";

pub struct MupdfBackend;

impl DocumentBackend for MupdfBackend {
    fn open(&self, bytes: Arc<[u8]>) -> Result<Box<dyn OpenDocument>, WorkerFault> {
        let doc = Document::from_bytes(&bytes, PDF_MAGIC)?;
        Ok(Box::new(MupdfDocument { doc }))
    }
}

struct MupdfDocument {
    doc: Document,
}

impl OpenDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, WorkerFault> {
        Ok(self.doc.page_count()?.max(0) as usize)
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32), WorkerFault> {
        let page = self.doc.load_page(index as i32)?;
        let bounds = page.bounds()?;
        Ok((bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn rasterize(&self, index: usize, mag: f32) -> Result<RgbImage, WorkerFault> {
        let page = self.doc.load_page(index as i32)?;
        let rgb = Colorspace::device_rgb();
        let pixmap = page.to_pixmap(&Matrix::new_scale(mag, mag), &rgb, false, false)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let pixels = pixmap_to_rgb(&pixmap)?;
        RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| WorkerFault::generic("Pixmap buffer size mismatch"))
    }
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, WorkerFault> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(WorkerFault::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    if samples.len() < stride.saturating_mul(height) || row_bytes > stride {
        return Err(WorkerFault::generic("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row_start = y * stride;
        let row = &samples[row_start..row_start + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(out)
}
