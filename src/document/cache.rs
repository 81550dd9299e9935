//! LRU cache for rendered pages

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use super::request::RenderParams;
use super::types::PageImage;

/// Cache key for rendered pages
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Page number (1-based)
    pub page: usize,
    pub viewport_width: u16,
    pub viewport_height: u16,
    /// Zoom factor (stored as thousandths for stable hashing)
    pub scale_millis: u32,
}

impl CacheKey {
    #[must_use]
    pub fn from_params(page: usize, params: &RenderParams) -> Self {
        Self {
            page,
            viewport_width: params.viewport.width,
            viewport_height: params.viewport.height,
            scale_millis: (params.scale * 1000.0).round() as u32,
        }
    }
}

/// LRU cache for rendered pages
pub struct PageCache {
    cache: LruCache<CacheKey, Arc<PageImage>>,
}

impl PageCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Get a cached page, promoting it in the LRU order
    #[must_use]
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PageImage>> {
        self.cache.get(key).cloned()
    }

    /// Insert a page into the cache, returning an Arc to the data
    pub fn insert(&mut self, key: CacheKey, image: PageImage) -> Arc<PageImage> {
        let arc = Arc::new(image);
        self.cache.put(key, arc.clone());
        arc
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}
