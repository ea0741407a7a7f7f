//! Translation lookaside buffer.
//!
//! Fully associative, LRU-replaced cache of page to frame translations.
//! It only accelerates lookups: every entry mirrors a page table entry.

use crate::recency::RecencyMap;
use crate::{FrameNumber, PageNumber};

/// Bounded LRU cache of page translations.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    entries: RecencyMap<PageNumber, FrameNumber>,
    capacity: usize,
}

impl TranslationCache {
    /// Create an empty TLB holding at most `capacity` translations.
    ///
    /// Storage grows on demand; `capacity` is only a bound.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RecencyMap::new(),
            capacity,
        }
    }

    /// Look up a translation, marking it most recently used on hit
    pub fn lookup(&mut self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.get(&page)
    }

    /// Insert a translation or refresh an existing one.
    ///
    /// Returns the page displaced by capacity eviction, if any.
    pub fn insert_or_refresh(&mut self, page: PageNumber, frame: FrameNumber) -> Option<PageNumber> {
        if self.entries.contains(&page) {
            self.entries.insert(page, frame);
            return None;
        }
        let displaced = if self.entries.len() >= self.capacity {
            self.entries.pop_lru().map(|(evicted, _)| evicted)
        } else {
            None
        };
        self.entries.insert(page, frame);
        displaced
    }

    /// Drop a translation. Only eviction calls this.
    pub fn invalidate(&mut self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.remove(&page)
    }

    /// Check for a translation without touching recency
    #[must_use]
    pub fn contains(&self, page: PageNumber) -> bool {
        self.entries.contains(&page)
    }

    /// Read a translation without touching recency
    #[must_use]
    pub fn peek(&self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.peek(&page)
    }

    /// Translations, least recently used first
    pub fn entries(&self) -> impl Iterator<Item = (PageNumber, FrameNumber)> + '_ {
        self.entries.iter()
    }

    /// Number of cached translations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every translation
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
