//! Physical frame pool.
//!
//! Pure occupancy bookkeeping: which frame holds which page. Victim choice
//! lives in [`crate::policy`].

use crate::error::{Result, SimError};
use crate::{FrameNumber, PageNumber};

/// Fixed array of frames, each empty or holding one page.
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    frames: Vec<Option<PageNumber>>,
    occupied: usize,
}

impl FrameAllocator {
    /// Create `num_frames` empty frames
    #[must_use]
    pub fn new(num_frames: usize) -> Self {
        Self {
            frames: vec![None; num_frames],
            occupied: 0,
        }
    }

    /// First free frame, scanning from frame 0
    #[must_use]
    pub fn allocate_free(&self) -> Option<FrameNumber> {
        if self.occupied == self.frames.len() {
            return None;
        }
        self.frames.iter().position(Option::is_none)
    }

    /// Record that `frame` now holds `page`.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the frame is out of range or already occupied.
    pub fn mark_occupied(&mut self, frame: FrameNumber, page: PageNumber) -> Result<()> {
        let slot = self.slot_mut(frame)?;
        if let Some(existing) = *slot {
            return Err(SimError::invariant(format!(
                "frame {frame} already holds page {existing}, cannot load page {page}"
            )));
        }
        *slot = Some(page);
        self.occupied += 1;
        Ok(())
    }

    /// Release `frame`, returning the page it held.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the frame is out of range or already free.
    pub fn mark_free(&mut self, frame: FrameNumber) -> Result<PageNumber> {
        let page = self
            .slot_mut(frame)?
            .take()
            .ok_or_else(|| SimError::invariant(format!("frame {frame} freed twice")))?;
        self.occupied -= 1;
        Ok(page)
    }

    /// Page held by `frame`, if any
    #[must_use]
    pub fn occupant(&self, frame: FrameNumber) -> Option<PageNumber> {
        self.frames.get(frame).copied().flatten()
    }

    /// Number of frames
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of occupied frames
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// True when every frame is occupied
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied == self.frames.len()
    }

    /// Occupied frames with their pages, in frame order
    pub fn occupied_frames(&self) -> impl Iterator<Item = (FrameNumber, PageNumber)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, page)| page.map(|p| (frame, p)))
    }

    /// Free every frame
    pub fn clear(&mut self) {
        self.frames.iter_mut().for_each(|f| *f = None);
        self.occupied = 0;
    }

    fn slot_mut(&mut self, frame: FrameNumber) -> Result<&mut Option<PageNumber>> {
        let len = self.frames.len();
        self.frames.get_mut(frame).ok_or_else(|| {
            SimError::invariant(format!("frame {frame} out of range (num_frames={len})"))
        })
    }
}
