//! Render worker - runs in its own thread for the life of a document

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{debug, warn};

use super::backend::{DocumentBackend, OpenDocument, RasterSpec};
use super::cache::{CacheKey, PageCache};
use super::request::{RenderParams, RenderRequest, RenderResponse, RequestId, WorkerFault};
use super::types::PageImage;

/// Open the document, report its page count, then serve page requests.
///
/// Queued page requests are coalesced: only the newest one is rendered.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Values moved into thread, need ownership"
)]
pub fn render_worker(
    bytes: Arc<[u8]>,
    backend: Arc<dyn DocumentBackend>,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
) {
    let doc = match backend.open(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Failed to open document: {e}");
            let _ = responses.send(RenderResponse::LoadFailed(e));
            return;
        }
    };

    match doc.page_count() {
        Ok(0) => {
            let _ = responses.send(RenderResponse::LoadFailed(WorkerFault::generic(
                "Document has no pages",
            )));
            return;
        }
        Ok(page_count) => {
            debug!("Document opened with {page_count} pages");
            let _ = responses.send(RenderResponse::DocumentInfo { page_count });
        }
        Err(e) => {
            let _ = responses.send(RenderResponse::LoadFailed(e));
            return;
        }
    }

    while let Ok(first) = requests.recv() {
        let Some(request) = newest_request(first, &requests) else {
            break;
        };
        match request {
            RenderRequest::Page { id, page, params } => {
                handle_page_request(doc.as_ref(), id, page, &params, &cache, &responses);
            }
            RenderRequest::Shutdown => break,
        }
    }
    debug!("Render worker exiting");
}

/// Drain the queue, keeping only the latest request. `None` means shut down.
fn newest_request(first: RenderRequest, requests: &Receiver<RenderRequest>) -> Option<RenderRequest> {
    let mut latest = first;
    loop {
        if matches!(latest, RenderRequest::Shutdown) {
            return None;
        }
        match requests.try_recv() {
            Ok(next) => {
                if let RenderRequest::Page { id, .. } = &latest {
                    debug!("Skipping superseded render request {id:?}");
                }
                latest = next;
            }
            Err(_) => return Some(latest),
        }
    }
}

fn handle_page_request(
    doc: &dyn OpenDocument,
    id: RequestId,
    page: usize,
    params: &RenderParams,
    cache: &Arc<Mutex<PageCache>>,
    responses: &Sender<RenderResponse>,
) {
    let key = CacheKey::from_params(page, params);

    let cached = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&key);
    if let Some(image) = cached {
        let _ = responses.send(RenderResponse::Page { id, image });
        return;
    }

    match render_page(doc, page, params) {
        Ok(image) => {
            let image = cache
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key, image);
            let _ = responses.send(RenderResponse::Page { id, image });
        }
        Err(error) => {
            warn!("Failed to render page {page}: {error}");
            let _ = responses.send(RenderResponse::Error { id, error });
        }
    }
}

/// Render a single page (1-based)
pub fn render_page(
    doc: &dyn OpenDocument,
    page: usize,
    params: &RenderParams,
) -> Result<PageImage, WorkerFault> {
    let index = page
        .checked_sub(1)
        .ok_or_else(|| WorkerFault::generic("page numbers start at 1"))?;
    let size = doc.page_size(index)?;
    let spec = RasterSpec::compute(size, params);
    let pixels = doc.rasterize(index, spec.mag)?;
    Ok(PageImage {
        page,
        scale: params.scale,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::document::backend::FakeBackend;
    use crate::document::types::Viewport;

    fn params() -> RenderParams {
        RenderParams {
            viewport: Viewport::new(20, 14),
            scale: 1.0,
        }
    }

    fn spawn(bytes: &[u8]) -> (Sender<RenderRequest>, Receiver<RenderResponse>) {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();
        let backend: Arc<dyn DocumentBackend> = Arc::new(FakeBackend::new(4));
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let cache = Arc::new(Mutex::new(PageCache::new(4)));
        std::thread::spawn(move || render_worker(bytes, backend, request_rx, response_tx, cache));
        (request_tx, response_rx)
    }

    #[test]
    fn reports_page_count_then_renders() {
        let (tx, rx) = spawn(b"%PDF-1.7");
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            RenderResponse::DocumentInfo { page_count } => assert_eq!(page_count, 4),
            other => panic!("unexpected {other:?}"),
        }

        tx.send(RenderRequest::Page {
            id: RequestId::new(7),
            page: 2,
            params: params(),
        })
        .unwrap();
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            RenderResponse::Page { id, image } => {
                assert_eq!(id, RequestId::new(7));
                assert_eq!(image.page, 2);
                assert_eq!(image.pixels.get_pixel(0, 0), &FakeBackend::shade(1));
            }
            other => panic!("unexpected {other:?}"),
        }
        tx.send(RenderRequest::Shutdown).unwrap();
    }

    #[test]
    fn open_failure_is_reported() {
        let (_tx, rx) = spawn(b"plain text");
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            RenderResponse::LoadFailed(_)
        ));
    }

    #[test]
    fn out_of_range_page_is_an_error_response() {
        let (tx, rx) = spawn(b"%PDF-1.7");
        let _ = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        tx.send(RenderRequest::Page {
            id: RequestId::new(1),
            page: 9,
            params: params(),
        })
        .unwrap();
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            RenderResponse::Error { .. }
        ));
    }

    #[test]
    fn newest_request_skips_superseded() {
        let (tx, rx) = flume::unbounded();
        for id in 2..=4 {
            tx.send(RenderRequest::Page {
                id: RequestId::new(id),
                page: id as usize,
                params: params(),
            })
            .unwrap();
        }
        let first = RenderRequest::Page {
            id: RequestId::new(1),
            page: 1,
            params: params(),
        };
        match newest_request(first, &rx) {
            Some(RenderRequest::Page { id, .. }) => assert_eq!(id, RequestId::new(4)),
            other => panic!("unexpected {other:?}"),
        }

        tx.send(RenderRequest::Shutdown).unwrap();
        let first = RenderRequest::Page {
            id: RequestId::new(5),
            page: 1,
            params: params(),
        };
        assert!(newest_request(first, &rx).is_none());
    }
}
