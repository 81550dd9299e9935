//! Page-jump coordination between the data panels and the document view.
//!
//! The coordinator owns the one authoritative current page. Panels and the
//! document toolbar only send requests; the document view is told what to
//! show through [`PageCoordinator::take_pending`], which hands out only the
//! newest target so a burst of requests collapses to the last one.

use log::debug;

use crate::document::clamp_page;

#[derive(Debug, Clone)]
pub struct PageCoordinator {
    /// Authoritative current page (1-based)
    current: usize,
    /// Page count once the document has loaded
    total: Option<usize>,
    /// The document view has not been told about `current` yet
    pending: bool,
    /// Bumped on every change of `current`
    revision: u64,
}

impl Default for PageCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCoordinator {
    pub fn new() -> Self {
        Self {
            current: 1,
            total: None,
            pending: false,
            revision: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> Option<usize> {
        self.total
    }

    /// Change counter for observers that cache anything derived from the page
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Ask for a page. Out-of-range values are clamped; while the page count
    /// is unknown, positive requests are held as-is and non-positive ones
    /// are ignored.
    pub fn request_page(&mut self, page: i64) {
        let target = match self.total {
            Some(total) => clamp_page(page, total),
            None if page <= 0 => {
                debug!("Ignoring page request {page} before the document has loaded");
                return;
            }
            None => page as usize,
        };
        debug!("Page request {page} -> {target}");
        self.set_current(target);
        self.pending = true;
    }

    /// The document finished loading with `total` pages
    pub fn set_total_pages(&mut self, total: usize) {
        self.total = Some(total);
        let clamped = clamp_page(self.current as i64, total);
        self.set_current(clamped);
        self.pending = true;
    }

    /// The document is gone or could not be loaded; the page count is
    /// unknown again and nothing is waiting to be shown
    pub fn reset(&mut self) {
        self.total = None;
        self.pending = false;
        self.set_current(1);
    }

    /// The document view navigated on its own (toolbar, keys)
    pub fn page_displayed(&mut self, page: usize) {
        self.set_current(page);
        self.pending = false;
    }

    /// Newest target the document view still has to show, at most once
    pub fn take_pending(&mut self) -> Option<usize> {
        if std::mem::take(&mut self.pending) {
            Some(self.current)
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    fn set_current(&mut self, page: usize) {
        if self.current != page {
            self.current = page;
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(total: usize) -> PageCoordinator {
        let mut sync = PageCoordinator::new();
        sync.set_total_pages(total);
        let _ = sync.take_pending();
        sync
    }

    #[test]
    fn requests_clamp_to_known_range() {
        let mut sync = loaded(10);
        for (requested, expected) in [(15, 10), (-3, 1), (0, 1), (4, 4), (10, 10), (11, 10)] {
            sync.request_page(requested);
            assert_eq!(sync.current_page(), expected, "request {requested}");
        }
    }

    #[test]
    fn burst_of_requests_yields_only_the_last() {
        let mut sync = loaded(20);
        sync.request_page(3);
        sync.request_page(12);
        sync.request_page(7);
        assert_eq!(sync.take_pending(), Some(7));
        assert_eq!(sync.take_pending(), None);
    }

    #[test]
    fn requests_before_load_are_held_then_clamped() {
        let mut sync = PageCoordinator::new();
        sync.request_page(-2);
        assert!(!sync.has_pending());
        assert_eq!(sync.current_page(), 1);

        sync.request_page(15);
        assert_eq!(sync.current_page(), 15);

        sync.set_total_pages(10);
        assert_eq!(sync.current_page(), 10);
        assert_eq!(sync.take_pending(), Some(10));
    }

    #[test]
    fn extreme_requests_land_on_the_ends() {
        let mut sync = PageCoordinator::new();
        sync.request_page(i64::MIN);
        assert!(!sync.has_pending());

        let mut sync = loaded(8);
        sync.request_page(i64::MAX);
        assert_eq!(sync.current_page(), 8);
        sync.request_page(i64::MIN);
        assert_eq!(sync.current_page(), 1);
    }

    #[test]
    fn huge_request_before_load_is_clamped_on_load() {
        let mut sync = PageCoordinator::new();
        sync.request_page(i64::MAX);
        assert!(sync.has_pending());
        sync.set_total_pages(6);
        assert_eq!(sync.take_pending(), Some(6));
    }

    #[test]
    fn displayed_page_is_a_write_without_pending() {
        let mut sync = loaded(5);
        sync.request_page(2);
        sync.page_displayed(4);
        assert_eq!(sync.current_page(), 4);
        assert_eq!(sync.take_pending(), None);
    }

    #[test]
    fn revision_tracks_changes_only() {
        let mut sync = loaded(5);
        let before = sync.revision();
        sync.request_page(1);
        assert_eq!(sync.revision(), before);
        sync.request_page(3);
        assert_eq!(sync.revision(), before + 1);
    }

    #[test]
    fn reset_forgets_page_count() {
        let mut sync = loaded(5);
        sync.request_page(4);
        sync.reset();
        assert_eq!(sync.total_pages(), None);
        assert_eq!(sync.current_page(), 1);
        assert!(!sync.has_pending());

        // Unclamped again until the next load
        sync.request_page(50);
        assert_eq!(sync.current_page(), 50);
    }
}
