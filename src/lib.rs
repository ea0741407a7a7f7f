//! aprender-vmsim: address translation simulator.
//!
//! Replays a trace of virtual addresses through a fully associative TLB, a
//! page table and a fixed pool of physical frames, counting TLB hits, TLB
//! misses and page faults. When frames run out, a configurable replacement
//! policy (LRU or Second-Chance) picks the victim.
//!
//! # Quick Start
//!
//! ```
//! use aprender_vmsim::{MemorySimulator, PolicyKind, SimulatorConfig};
//!
//! let config = SimulatorConfig::new()
//!     .with_page_size(4096)
//!     .with_tlb_entries(1)
//!     .with_num_frames(2)
//!     .with_policy(PolicyKind::Lru);
//! let mut sim = MemorySimulator::new(config).unwrap();
//!
//! for page in [0u64, 1, 0, 2] {
//!     sim.access_memory(page * 4096).unwrap();
//! }
//!
//! let stats = sim.statistics();
//! assert_eq!(stats.tlb_hits, 0);
//! assert_eq!(stats.tlb_misses, 4);
//! assert_eq!(stats.page_faults, 3);
//! assert!(!sim.is_resident(1));
//! ```
//!
//! # Modules
//!
//! - [`config`]: Sizing parameters and policy selection
//! - [`simulator`]: The access engine and its outcomes
//! - [`tlb`], [`page_table`], [`frame`]: The three translation structures
//! - [`residency`]: Keeps the three structures consistent across evictions
//! - [`policy`]: LRU and Second-Chance replacement
//! - [`statistics`]: Counters and the textual report
//! - [`trace`]: Trace file parsing and synthetic trace generation

pub mod config;
pub mod error;
pub mod frame;
pub mod page_table;
pub mod policy;
pub mod recency;
pub mod residency;
pub mod simulator;
pub mod statistics;
pub mod tlb;
pub mod trace;

/// A virtual byte address.
pub type VirtualAddress = u64;
/// Virtual page index (`address / page_size`).
pub type PageNumber = u64;
/// Physical frame index in `[0, num_frames)`.
pub type FrameNumber = usize;

pub use config::{PolicyKind, SimulatorConfig};
pub use error::{Result, SimError};
pub use simulator::{AccessOutcome, MemorySimulator};
pub use statistics::{Statistics, StatisticsReport};
pub use trace::TraceGenerator;
