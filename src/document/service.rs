//! Render service - owns the worker thread and the render state for one document

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{debug, info, warn};

use super::backend::DocumentBackend;
use super::cache::PageCache;
use super::request::{RenderRequest, RenderResponse, RequestId};
use super::state::{Command, Effect, LoadState, RenderState};
use super::types::{DocumentSource, PageImage, Viewport};
use super::worker::render_worker;
use super::zoom::ScrollDirection;

/// Notifications for the rest of the app
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Document finished loading
    Loaded { page_count: usize },
    /// Document failed to load
    Failed(String),
    /// The displayed page changed through navigation (1-based)
    PageChanged(usize),
    /// Something on screen changed
    Redraw,
}

/// Manages rendering of one document with a worker thread and cache.
///
/// Dropping the service shuts the worker down and drops its open document.
pub struct RenderService {
    state: RenderState,
    name: String,
    request_tx: Sender<RenderRequest>,
    response_rx: Receiver<RenderResponse>,
    next_request_id: u64,
    latest_request: Option<RequestId>,
    displayed: Option<Arc<PageImage>>,
    render_error: Option<String>,
}

impl RenderService {
    /// Start loading a document
    #[must_use]
    pub fn open(
        source: &DocumentSource,
        backend: Arc<dyn DocumentBackend>,
        zoom: f32,
        cache_size: usize,
    ) -> Self {
        let cache = Arc::new(Mutex::new(PageCache::new(cache_size)));
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let bytes = source.bytes();
        std::thread::spawn(move || {
            render_worker(bytes, backend, request_rx, response_tx, cache);
        });

        let mut state = RenderState::new(zoom);
        let _ = state.apply(Command::BeginLoad);
        info!("Loading document {}", source.name());

        Self {
            state,
            name: source.name().to_string(),
            request_tx,
            response_rx,
            next_request_id: 1,
            latest_request: None,
            displayed: None,
            render_error: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state.load
    }

    pub fn page_count(&self) -> Option<usize> {
        self.state.load.page_count()
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Page image on screen, if it matches the latest request
    pub fn displayed(&self) -> Option<&Arc<PageImage>> {
        self.displayed.as_ref()
    }

    /// Error from rendering the current page, if any
    pub fn render_error(&self) -> Option<&str> {
        self.render_error.as_deref()
    }

    /// True while a render for the current page is in flight
    pub fn is_rendering(&self) -> bool {
        self.latest_request.is_some()
    }

    pub fn go_to(&mut self, page: i64) -> Vec<DocumentEvent> {
        self.apply_command(Command::GoToPage(page))
    }

    pub fn next_page(&mut self) -> Vec<DocumentEvent> {
        self.apply_command(Command::NextPage)
    }

    pub fn previous_page(&mut self) -> Vec<DocumentEvent> {
        self.apply_command(Command::PreviousPage)
    }

    pub fn zoom_in(&mut self) -> Vec<DocumentEvent> {
        self.apply_command(Command::ZoomIn)
    }

    pub fn zoom_out(&mut self) -> Vec<DocumentEvent> {
        self.apply_command(Command::ZoomOut)
    }

    pub fn pan(&mut self, direction: ScrollDirection) -> Vec<DocumentEvent> {
        self.apply_command(Command::Pan(direction))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<DocumentEvent> {
        self.apply_command(Command::SetViewport(viewport))
    }

    /// Drain worker responses. Call once per tick.
    pub fn poll(&mut self) -> Vec<DocumentEvent> {
        let mut events = Vec::new();
        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                RenderResponse::DocumentInfo { page_count } => {
                    info!("Document {} ready with {page_count} pages", self.name);
                    events.extend(self.apply_command(Command::Loaded { page_count }));
                    events.push(DocumentEvent::Loaded { page_count });
                }
                RenderResponse::LoadFailed(error) => {
                    let message = format!("Failed to load PDF: {error}");
                    warn!("{message}");
                    events.extend(self.apply_command(Command::LoadFailed(message.clone())));
                    events.push(DocumentEvent::Failed(message));
                }
                RenderResponse::Page { id, image } => {
                    if self.latest_request == Some(id) {
                        self.latest_request = None;
                        self.render_error = None;
                        self.state.content_cells = (image.width_cells(), image.height_cells());
                        self.displayed = Some(image);
                        events.push(DocumentEvent::Redraw);
                    } else {
                        debug!("Dropping stale render of page {}", image.page);
                    }
                }
                RenderResponse::Error { id, error } => {
                    if self.latest_request == Some(id) {
                        self.latest_request = None;
                        self.displayed = None;
                        self.render_error = Some(error.to_string());
                        events.push(DocumentEvent::Redraw);
                    }
                }
            }
        }
        events
    }

    fn apply_command(&mut self, cmd: Command) -> Vec<DocumentEvent> {
        let effects = self.state.apply(cmd);
        self.execute_effects(effects)
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) -> Vec<DocumentEvent> {
        let mut events = Vec::new();
        for effect in effects {
            match effect {
                Effect::InvalidateDisplay => {
                    self.displayed = None;
                    self.latest_request = None;
                    events.push(DocumentEvent::Redraw);
                }
                Effect::RenderCurrentPage => {
                    self.request_current_page();
                    events.push(DocumentEvent::Redraw);
                }
                Effect::PageChanged(page) => {
                    events.push(DocumentEvent::PageChanged(page));
                }
                Effect::Redraw => events.push(DocumentEvent::Redraw),
            }
        }
        events
    }

    fn request_current_page(&mut self) {
        if self.state.viewport.is_empty() {
            // Rendered once the first frame reports its size
            return;
        }
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        self.latest_request = Some(id);
        let request = RenderRequest::Page {
            id,
            page: self.state.current_page,
            params: self.state.render_params(),
        };
        if self.request_tx.send(request).is_err() {
            warn!("Render worker for {} is gone", self.name);
            self.latest_request = None;
        }
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        let _ = self.request_tx.send(RenderRequest::Shutdown);
        debug!("Render service for {} shut down", self.name);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::document::backend::FakeBackend;

    fn open(bytes: &[u8], pages: usize) -> RenderService {
        let source = DocumentSource::from_bytes("claim.pdf", bytes.to_vec());
        RenderService::open(&source, Arc::new(FakeBackend::new(pages)), 1.2, 8)
    }

    fn poll_until(
        service: &mut RenderService,
        mut done: impl FnMut(&RenderService) -> bool,
    ) -> Vec<DocumentEvent> {
        let deadline = Instant::now() + Duration::from_secs(3);
        let mut events = Vec::new();
        while !done(&*service) && Instant::now() < deadline {
            events.extend(service.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn loads_and_renders_first_page() {
        let mut service = open(b"%PDF-1.7", 10);
        assert_eq!(service.load_state(), &LoadState::Loading);
        let _ = service.set_viewport(Viewport::new(30, 20));

        let events = poll_until(&mut service, |s| s.displayed().is_some());
        assert!(events.contains(&DocumentEvent::Loaded { page_count: 10 }));
        assert_eq!(service.page_count(), Some(10));
        assert_eq!(service.displayed().unwrap().page, 1);
    }

    #[test]
    fn failed_load_enters_error_state() {
        let mut service = open(b"not a pdf", 3);
        let events = poll_until(&mut service, |s| {
            matches!(s.load_state(), LoadState::Error { .. })
        });
        assert!(matches!(events.last(), Some(DocumentEvent::Failed(_))));
        assert!(service.go_to(2).is_empty());
        assert!(service.displayed().is_none());
    }

    #[test]
    fn only_latest_page_is_displayed() {
        let mut service = open(b"%PDF-1.7", 10);
        let _ = service.set_viewport(Viewport::new(30, 20));
        let _ = poll_until(&mut service, |s| s.displayed().is_some());

        let _ = service.go_to(3);
        let _ = service.go_to(7);
        let events = service.go_to(5);
        assert!(events.contains(&DocumentEvent::PageChanged(5)));

        let _ = poll_until(&mut service, |s| !s.is_rendering());
        assert_eq!(service.displayed().unwrap().page, 5);
        assert_eq!(service.current_page(), 5);
    }

    #[test]
    fn dropping_service_lets_go_of_document_bytes() {
        let source = DocumentSource::from_bytes("claim.pdf", b"%PDF-1.7".to_vec());
        let watch = source.watch();
        let mut service = RenderService::open(&source, Arc::new(FakeBackend::new(2)), 1.2, 4);
        let _ = poll_until(&mut service, |s| s.page_count().is_some());
        drop(service);
        drop(source);

        let deadline = Instant::now() + Duration::from_secs(3);
        while watch.upgrade().is_some() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(watch.upgrade().is_none());
    }
}
