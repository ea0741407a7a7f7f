//! Page replacement policies.
//!
//! A policy is consulted only when the frame pool is exhausted. It picks one
//! resident page, evicts it through [`Residency`] (so the TLB, page table and
//! frame pool change together) and hands back the freed frame.
//!
//! # Policies
//!
//! - [`LruPolicy`]: evicts the page table's least recently resolved entry
//! - [`SecondChancePolicy`]: clock scan over frames with one reference bit each

mod lru;
mod second_chance;

pub use lru::LruPolicy;
pub use second_chance::SecondChancePolicy;

use crate::config::PolicyKind;
use crate::error::Result;
use crate::residency::Residency;
use crate::{FrameNumber, PageNumber};
use std::fmt;

/// A completed eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    /// Page removed from memory
    pub page: PageNumber,
    /// Frame that is now free
    pub frame: FrameNumber,
    /// Frames examined before the victim was chosen (1 for LRU)
    pub scanned: usize,
}

/// Victim selection strategy.
pub trait ReplacementPolicy: fmt::Debug + Send {
    /// Which policy this is
    fn kind(&self) -> PolicyKind;

    /// Called after every successful resolution of the page held in `frame`.
    fn on_resolve(&mut self, _frame: FrameNumber) {}

    /// Evict exactly one resident page and return what was freed.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if no page can be evicted.
    fn evict(&mut self, memory: &mut Residency) -> Result<Eviction>;

    /// Forget all policy state
    fn reset(&mut self) {}
}

/// Build the policy selected by `kind` for a pool of `num_frames` frames.
#[must_use]
pub fn build_policy(kind: PolicyKind, num_frames: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy::new()),
        PolicyKind::SecondChance => Box::new(SecondChancePolicy::new(num_frames)),
    }
}

#[cfg(test)]
mod tests;
