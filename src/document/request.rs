//! Render request and response types

use std::sync::Arc;

use super::types::{PageImage, Viewport};

/// Unique identifier for render requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Parameters for rendering a page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// Viewport in terminal cells
    pub viewport: Viewport,
    /// User zoom factor (1.0 = fit page)
    pub scale: f32,
}

/// Request sent to the render worker
#[derive(Debug)]
pub enum RenderRequest {
    /// Render a page (1-based)
    Page {
        id: RequestId,
        page: usize,
        params: RenderParams,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Errors from the render worker
#[derive(Debug, thiserror::Error)]
pub enum WorkerFault {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Generic { detail: String },
}

impl WorkerFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Response from the render worker
#[derive(Debug)]
pub enum RenderResponse {
    /// Document opened (sent once, before any page)
    DocumentInfo { page_count: usize },

    /// Document could not be opened
    LoadFailed(WorkerFault),

    /// Rendered page
    Page { id: RequestId, image: Arc<PageImage> },

    /// Error while rendering a page
    Error { id: RequestId, error: WorkerFault },
}
