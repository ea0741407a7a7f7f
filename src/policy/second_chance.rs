//! Second-Chance (clock) replacement.
//!
//! Frames form a ring swept by a hand. A frame whose reference bit is set
//! has the bit cleared and is skipped; the first frame found with a clear
//! bit is the victim. One full sweep clears every bit, so a victim is always
//! found within two sweeps of a full pool.

use super::{Eviction, ReplacementPolicy};
use crate::config::PolicyKind;
use crate::error::{Result, SimError};
use crate::residency::Residency;
use crate::FrameNumber;

/// Clock hand plus one reference bit per frame.
#[derive(Debug, Clone)]
pub struct SecondChancePolicy {
    referenced: Vec<bool>,
    hand: usize,
}

impl SecondChancePolicy {
    /// Create the policy for `num_frames` frames, all bits clear, hand at frame 0
    #[must_use]
    pub fn new(num_frames: usize) -> Self {
        Self {
            referenced: vec![false; num_frames],
            hand: 0,
        }
    }

    /// Reference bit of `frame`
    #[must_use]
    pub fn is_referenced(&self, frame: FrameNumber) -> bool {
        self.referenced.get(frame).copied().unwrap_or(false)
    }

    /// Frame the next scan starts from
    #[must_use]
    pub fn hand(&self) -> FrameNumber {
        self.hand
    }

    fn advance(&mut self) {
        self.hand = (self.hand + 1) % self.referenced.len();
    }
}

impl ReplacementPolicy for SecondChancePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::SecondChance
    }

    fn on_resolve(&mut self, frame: FrameNumber) {
        if let Some(bit) = self.referenced.get_mut(frame) {
            *bit = true;
        }
    }

    fn evict(&mut self, memory: &mut Residency) -> Result<Eviction> {
        let limit = 2 * self.referenced.len();
        for step in 1..=limit {
            let frame = self.hand;
            self.advance();

            let Some(page) = memory.frames.occupant(frame) else {
                continue;
            };
            if self.referenced[frame] {
                self.referenced[frame] = false;
                continue;
            }

            let freed = memory.evict_page(page)?;
            if freed != frame {
                return Err(SimError::invariant(format!(
                    "frame {frame} holds page {page} but the page table maps it to frame {freed}"
                )));
            }
            return Ok(Eviction {
                page,
                frame,
                scanned: step,
            });
        }
        Err(SimError::invariant(format!(
            "clock scan found no victim within {limit} steps ({} frames occupied)",
            memory.frames.occupied()
        )))
    }

    fn reset(&mut self) {
        self.referenced.iter_mut().for_each(|bit| *bit = false);
        self.hand = 0;
    }
}
