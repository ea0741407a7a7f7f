//! The three structures a translation touches, kept mutually consistent.
//!
//! Eviction and installation go through this type so that the TLB, the page
//! table and the frame pool always change together.

use crate::error::{Result, SimError};
use crate::frame::FrameAllocator;
use crate::page_table::PageTable;
use crate::tlb::TranslationCache;
use crate::{FrameNumber, PageNumber};

/// TLB, page table and frame pool of one simulator.
#[derive(Debug, Clone)]
pub struct Residency {
    /// Translation cache
    pub tlb: TranslationCache,
    /// Authoritative page table
    pub page_table: PageTable,
    /// Physical frame pool
    pub frames: FrameAllocator,
}

impl Residency {
    /// Create empty structures
    #[must_use]
    pub fn new(tlb_entries: usize, num_frames: usize) -> Self {
        Self {
            tlb: TranslationCache::new(tlb_entries),
            page_table: PageTable::new(num_frames),
            frames: FrameAllocator::new(num_frames),
        }
    }

    /// Load a faulted page into a free frame.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the page is already resident or the
    /// frame is not free.
    pub fn install(&mut self, page: PageNumber, frame: FrameNumber) -> Result<()> {
        self.frames.mark_occupied(frame, page)?;
        if let Err(err) = self.page_table.install(page, frame) {
            // Leave frame bookkeeping as it was before the call.
            let held = self.frames.mark_free(frame)?;
            if held != page {
                return Err(SimError::invariant(format!(
                    "rollback of frame {frame} found page {held}, expected page {page}"
                )));
            }
            return Err(err);
        }
        Ok(())
    }

    /// Evict a resident page from every structure, returning its freed frame.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the page is not resident or its
    /// frame does not record it.
    pub fn evict_page(&mut self, page: PageNumber) -> Result<FrameNumber> {
        let frame = self.page_table.remove(page).ok_or_else(|| {
            SimError::invariant(format!("eviction of non-resident page {page}"))
        })?;
        self.release(page, frame)?;
        Ok(frame)
    }

    /// Finish an eviction whose page table entry is already gone: drop the
    /// TLB entry and free the frame.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the frame does not hold `page`.
    pub fn release(&mut self, page: PageNumber, frame: FrameNumber) -> Result<()> {
        if let Some(cached) = self.tlb.invalidate(page) {
            if cached != frame {
                return Err(SimError::invariant(format!(
                    "TLB mapped page {page} to frame {cached}, page table to frame {frame}"
                )));
            }
        }
        let held = self.frames.mark_free(frame)?;
        if held != page {
            return Err(SimError::invariant(format!(
                "frame {frame} held page {held}, expected page {page}"
            )));
        }
        Ok(())
    }

    /// Verify TLB ⊆ page table, capacity bounds, and the frame/page table bijection.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation describing the first breach found.
    pub fn check_invariants(&self) -> Result<()> {
        if self.tlb.len() > self.tlb.capacity() {
            return Err(SimError::invariant(format!(
                "TLB holds {} entries, capacity {}",
                self.tlb.len(),
                self.tlb.capacity()
            )));
        }
        if self.page_table.len() > self.frames.num_frames() {
            return Err(SimError::invariant(format!(
                "page table holds {} entries, only {} frames",
                self.page_table.len(),
                self.frames.num_frames()
            )));
        }
        for (page, frame) in self.tlb.entries() {
            match self.page_table.peek(page) {
                Some(mapped) if mapped == frame => {}
                Some(mapped) => {
                    return Err(SimError::invariant(format!(
                        "TLB maps page {page} to frame {frame}, page table to frame {mapped}"
                    )))
                }
                None => {
                    return Err(SimError::invariant(format!(
                        "TLB holds non-resident page {page}"
                    )))
                }
            }
        }
        if self.frames.occupied() != self.page_table.len() {
            return Err(SimError::invariant(format!(
                "{} frames occupied but {} pages resident",
                self.frames.occupied(),
                self.page_table.len()
            )));
        }
        for (page, frame) in self.page_table.entries() {
            if self.frames.occupant(frame) != Some(page) {
                return Err(SimError::invariant(format!(
                    "page table maps page {page} to frame {frame}, frame holds {:?}",
                    self.frames.occupant(frame)
                )));
            }
        }
        Ok(())
    }

    /// Empty every structure
    pub fn clear(&mut self) {
        self.tlb.clear();
        self.page_table.clear();
        self.frames.clear();
    }
}
