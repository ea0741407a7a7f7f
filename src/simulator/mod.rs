//! Memory access engine.
//!
//! Each [`MemorySimulator::access_memory`] call makes one linear pass:
//!
//! ```text
//! TLB lookup ──hit──────────────────────────────────────────────► resolved
//!     │ miss
//!     ▼
//! page table lookup ──hit──► refresh TLB ───────────────────────► resolved
//!     │ miss (page fault)
//!     ▼
//! free frame, or policy evicts one ──► install in page table,
//!                                      frame pool and TLB ──────► resolved
//! ```
//!
//! The fault path installs and resolves in the same call; it never loops back
//! to the TLB lookup. Every resolution refreshes the page table's recency and
//! tells the policy which frame was used.

use crate::config::{PolicyKind, SimulatorConfig};
use crate::error::{Result, SimError};
use crate::policy::{build_policy, ReplacementPolicy};
use crate::residency::Residency;
use crate::statistics::{Statistics, StatisticsReport};
use crate::{FrameNumber, PageNumber, VirtualAddress};
use log::{debug, info};
use std::fmt;

/// How a single access was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Translation found in the TLB
    TlbHit {
        /// Page accessed
        page: PageNumber,
        /// Frame holding it
        frame: FrameNumber,
    },
    /// TLB missed, page table resolved the page
    PageTableHit {
        /// Page accessed
        page: PageNumber,
        /// Frame holding it
        frame: FrameNumber,
    },
    /// Page was not resident and had to be loaded
    PageFault {
        /// Page accessed
        page: PageNumber,
        /// Frame it was loaded into
        frame: FrameNumber,
        /// Page evicted to make room, if the pool was full
        evicted: Option<PageNumber>,
    },
}

impl AccessOutcome {
    /// Page the access resolved
    #[must_use]
    pub fn page(&self) -> PageNumber {
        match *self {
            Self::TlbHit { page, .. }
            | Self::PageTableHit { page, .. }
            | Self::PageFault { page, .. } => page,
        }
    }

    /// Frame the page resolved to
    #[must_use]
    pub fn frame(&self) -> FrameNumber {
        match *self {
            Self::TlbHit { frame, .. }
            | Self::PageTableHit { frame, .. }
            | Self::PageFault { frame, .. } => frame,
        }
    }

    /// True for a TLB hit
    #[must_use]
    pub fn is_tlb_hit(&self) -> bool {
        matches!(self, Self::TlbHit { .. })
    }

    /// True for a page fault
    #[must_use]
    pub fn is_page_fault(&self) -> bool {
        matches!(self, Self::PageFault { .. })
    }

    /// Page evicted by this access, if any
    #[must_use]
    pub fn evicted(&self) -> Option<PageNumber> {
        match *self {
            Self::PageFault { evicted, .. } => evicted,
            _ => None,
        }
    }
}

/// TLB, page table and frame pool driven by a replacement policy.
///
/// # Example
///
/// ```
/// use aprender_vmsim::{MemorySimulator, SimulatorConfig};
///
/// let config = SimulatorConfig::new().with_tlb_entries(2).with_num_frames(2);
/// let mut sim = MemorySimulator::new(config).unwrap();
///
/// assert!(sim.access_memory(0x1000).unwrap().is_page_fault());
/// assert!(sim.access_memory(0x1004).unwrap().is_tlb_hit());
/// assert_eq!(sim.statistics().tlb_hits, 1);
/// assert_eq!(sim.statistics().page_faults, 1);
/// ```
#[derive(Debug)]
pub struct MemorySimulator {
    config: SimulatorConfig,
    memory: Residency,
    policy: Box<dyn ReplacementPolicy>,
    stats: Statistics,
}

impl MemorySimulator {
    /// Build a simulator with empty TLB, page table and frames.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any size is zero. Nothing is built.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "simulator: policy={} page_size={} tlb_entries={} frames={}",
            config.replacement_policy, config.page_size, config.tlb_entries, config.num_frames
        );
        Ok(Self {
            memory: Residency::new(config.tlb_entries, config.num_frames),
            policy: build_policy(config.replacement_policy, config.num_frames),
            stats: Statistics::new(),
            config,
        })
    }

    /// Page containing `address`
    #[must_use]
    pub fn page_number(&self, address: VirtualAddress) -> PageNumber {
        address / self.config.page_size
    }

    /// Resolve one virtual address, updating counters and structures.
    ///
    /// # Errors
    ///
    /// Only returns an invariant violation, which means the engine's
    /// bookkeeping is corrupt. Callers should abort rather than retry.
    pub fn access_memory(&mut self, address: VirtualAddress) -> Result<AccessOutcome> {
        let page = self.page_number(address);

        if let Some(frame) = self.memory.tlb.lookup(page) {
            self.stats.record_tlb_hit();
            if !self.memory.page_table.touch(page) {
                return Err(SimError::invariant(format!(
                    "TLB hit for page {page} which is not in the page table"
                )));
            }
            self.policy.on_resolve(frame);
            self.trace(format_args!(
                "{address:#x}: page {page} TLB hit -> frame {frame}"
            ));
            return Ok(AccessOutcome::TlbHit { page, frame });
        }
        self.stats.record_tlb_miss();

        if let Some(frame) = self.memory.page_table.lookup(page) {
            self.memory.tlb.insert_or_refresh(page, frame);
            self.policy.on_resolve(frame);
            self.trace(format_args!(
                "{address:#x}: page {page} TLB miss, page table hit -> frame {frame}"
            ));
            return Ok(AccessOutcome::PageTableHit { page, frame });
        }
        self.stats.record_page_fault();

        let (frame, evicted) = match self.memory.frames.allocate_free() {
            Some(frame) => (frame, None),
            None => {
                let eviction = self.policy.evict(&mut self.memory)?;
                self.stats.record_eviction();
                self.trace(format_args!(
                    "evicted page {} from frame {} ({} frames scanned)",
                    eviction.page, eviction.frame, eviction.scanned
                ));
                (eviction.frame, Some(eviction.page))
            }
        };
        self.memory.install(page, frame)?;
        self.memory.tlb.insert_or_refresh(page, frame);
        self.policy.on_resolve(frame);
        self.trace(format_args!(
            "{address:#x}: page {page} fault, loaded into frame {frame}"
        ));

        Ok(AccessOutcome::PageFault {
            page,
            frame,
            evicted,
        })
    }

    /// Replay a sequence of addresses, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Propagates the first invariant violation.
    pub fn run_trace<I>(&mut self, addresses: I) -> Result<Statistics>
    where
        I: IntoIterator<Item = VirtualAddress>,
    {
        for address in addresses {
            self.access_memory(address)?;
        }
        Ok(self.stats)
    }

    /// Counters so far
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Configuration this simulator was built with
    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Active replacement policy
    #[must_use]
    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    /// TLB, page table and frames, for inspection
    #[must_use]
    pub fn memory(&self) -> &Residency {
        &self.memory
    }

    /// Number of cached translations
    #[must_use]
    pub fn tlb_len(&self) -> usize {
        self.memory.tlb.len()
    }

    /// Number of resident pages
    #[must_use]
    pub fn resident_pages(&self) -> usize {
        self.memory.page_table.len()
    }

    /// True if `page` is in the page table
    #[must_use]
    pub fn is_resident(&self, page: PageNumber) -> bool {
        self.memory.page_table.peek(page).is_some()
    }

    /// True if `page` is in the TLB
    #[must_use]
    pub fn tlb_contains(&self, page: PageNumber) -> bool {
        self.memory.tlb.contains(page)
    }

    /// Verify the TLB, page table and frame pool agree.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation describing the first inconsistency.
    pub fn check_invariants(&self) -> Result<()> {
        self.memory.check_invariants()
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        self.memory.clear();
        self.policy.reset();
        self.stats = Statistics::new();
    }

    /// Configuration and counters as the fixed-layout report
    #[must_use]
    pub fn report(&self) -> StatisticsReport {
        StatisticsReport::new(self.config.clone(), self.stats)
    }

    /// Write the statistics report to stdout
    pub fn print_statistics(&self) {
        print!("{}", self.report());
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        if self.config.debug {
            debug!("{args}");
        }
    }
}
