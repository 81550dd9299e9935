//! Document rendering infrastructure

mod backend;
mod cache;
#[cfg(feature = "pdf")]
mod mupdf_backend;
mod request;
mod service;
mod state;
mod types;
mod worker;
mod zoom;

pub use backend::{DocumentBackend, MAX_RASTER_DIMENSION, OpenDocument, RasterSpec};
#[cfg(any(test, feature = "test-utils"))]
pub use backend::FakeBackend;
pub use cache::{CacheKey, PageCache};
#[cfg(feature = "pdf")]
pub use mupdf_backend::MupdfBackend;
pub use request::{RenderParams, RenderRequest, RenderResponse, RequestId, WorkerFault};
pub use service::{DocumentEvent, RenderService};
pub use state::{Command, Effect, LoadState, RenderState, clamp_page};
pub use types::{DocumentSource, PageImage, Viewport};
pub use zoom::{ScrollDirection, Zoom};

/// Default number of rendered pages kept per document
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// The rasteriser the app uses when none is injected
pub fn default_backend() -> std::sync::Arc<dyn DocumentBackend> {
    #[cfg(feature = "pdf")]
    {
        std::sync::Arc::new(MupdfBackend)
    }
    #[cfg(not(feature = "pdf"))]
    {
        std::sync::Arc::new(UnsupportedBackend)
    }
}

/// Used when built without the `pdf` feature: every document fails to load
#[cfg(not(feature = "pdf"))]
struct UnsupportedBackend;

#[cfg(not(feature = "pdf"))]
impl DocumentBackend for UnsupportedBackend {
    fn open(
        &self,
        _bytes: std::sync::Arc<[u8]>,
    ) -> Result<Box<dyn OpenDocument>, WorkerFault> {
        Err(WorkerFault::generic(
            "PDF support is disabled (build with the `pdf` feature)",
        ))
    }
}
