//! Least Recently Used replacement.

use super::{Eviction, ReplacementPolicy};
use crate::config::PolicyKind;
use crate::error::Result;
use crate::residency::Residency;

/// Evicts the page least recently resolved by any path.
///
/// Holds no state of its own: the page table's recency order, refreshed on
/// TLB hits, page table hits and installs alike, is the LRU stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Create the policy
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    fn evict(&mut self, memory: &mut Residency) -> Result<Eviction> {
        let (page, frame) = memory.page_table.evict_least_recent()?;
        memory.release(page, frame)?;
        Ok(Eviction {
            page,
            frame,
            scanned: 1,
        })
    }
}
