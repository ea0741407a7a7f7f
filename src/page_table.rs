//! Page table.
//!
//! Authoritative map from resident page to frame. Its recency order is the
//! one the LRU policy evicts from, so every successful resolution must
//! refresh it, whichever path resolved the access.

use crate::error::{Result, SimError};
use crate::recency::RecencyMap;
use crate::{FrameNumber, PageNumber};

/// Resident page to frame mapping, recency ordered.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    entries: RecencyMap<PageNumber, FrameNumber>,
}

impl PageTable {
    /// Create an empty page table sized for `num_frames` residents
    #[must_use]
    pub fn new(num_frames: usize) -> Self {
        Self {
            entries: RecencyMap::with_capacity(num_frames),
        }
    }

    /// Resolve a page, refreshing its recency on hit
    pub fn lookup(&mut self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.get(&page)
    }

    /// Resolve a page without touching recency
    #[must_use]
    pub fn peek(&self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.peek(&page)
    }

    /// Refresh a page's recency. Returns false if the page is not resident.
    pub fn touch(&mut self, page: PageNumber) -> bool {
        self.entries.touch(&page)
    }

    /// Map a newly faulted page at the most recently used position.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the page is already resident or the
    /// frame already backs another page.
    pub fn install(&mut self, page: PageNumber, frame: FrameNumber) -> Result<()> {
        if let Some(existing) = self.entries.peek(&page) {
            return Err(SimError::invariant(format!(
                "page {page} installed twice (already in frame {existing})"
            )));
        }
        if let Some((owner, _)) = self.entries.iter().find(|&(_, f)| f == frame) {
            return Err(SimError::invariant(format!(
                "frame {frame} already mapped to page {owner}, cannot install page {page}"
            )));
        }
        self.entries.insert(page, frame);
        Ok(())
    }

    /// Remove and return the least recently resolved mapping.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the table is empty.
    pub fn evict_least_recent(&mut self) -> Result<(PageNumber, FrameNumber)> {
        self.entries
            .pop_lru()
            .ok_or_else(|| SimError::invariant("eviction requested from an empty page table"))
    }

    /// Remove a mapping, returning its frame
    pub fn remove(&mut self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.remove(&page)
    }

    /// Mappings, least recently resolved first
    pub fn entries(&self) -> impl Iterator<Item = (PageNumber, FrameNumber)> + '_ {
        self.entries.iter()
    }

    /// Number of resident pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no page is resident
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every mapping
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
