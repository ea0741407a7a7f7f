//! Address traces: parsing, writing and seeded synthetic generation.
//!
//! Trace files hold one address per line, decimal or `0x`-prefixed hex.
//! Blank lines and `#` comments are ignored.

use crate::error::{Result, SimError};
use crate::VirtualAddress;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parse a single address token.
#[must_use]
pub fn parse_address(token: &str) -> Option<VirtualAddress> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        VirtualAddress::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}

/// Read every address from a trace.
///
/// # Errors
///
/// Returns [`SimError::TraceParse`] with the 1-based line number of the first
/// malformed line, or an I/O error.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<VirtualAddress>> {
    let mut addresses = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let address = parse_address(content).ok_or_else(|| SimError::TraceParse {
            line: idx + 1,
            content: line.clone(),
        })?;
        addresses.push(address);
    }
    Ok(addresses)
}

/// Read a trace file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened, otherwise as [`parse_trace`].
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<VirtualAddress>> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}

/// Write addresses one per line in hex.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_trace<W: Write>(writer: W, addresses: &[VirtualAddress]) -> Result<()> {
    let mut out = BufWriter::new(writer);
    for address in addresses {
        writeln!(out, "{address:#x}")?;
    }
    out.flush()?;
    Ok(())
}

/// Seeded generator of synthetic traces with tunable temporal locality.
///
/// With probability `locality` an access re-touches one of the last
/// `window` uniformly drawn pages; otherwise it draws a fresh page from
/// `[0, pages)`. The offset inside the page is uniform.
///
/// # Example
///
/// ```
/// use aprender_vmsim::TraceGenerator;
///
/// let gen = TraceGenerator::new(32).with_locality(0.8).with_seed(7);
/// let a = gen.generate(100);
/// let b = gen.generate(100);
/// assert_eq!(a, b);
/// assert!(a.iter().all(|&addr| addr < 32 * 4096));
/// ```
#[derive(Debug, Clone)]
pub struct TraceGenerator {
    /// Number of distinct pages in the address space
    pub pages: u64,
    /// Page size in bytes
    pub page_size: u64,
    /// Probability of re-touching a recent page (0.0 - 1.0)
    pub locality: f64,
    /// Number of recent pages eligible for re-touching
    pub window: usize,
    /// RNG seed
    pub seed: u64,
}

impl TraceGenerator {
    /// Uniform generator over `pages` pages of 4096 bytes, seed 42
    #[must_use]
    pub fn new(pages: u64) -> Self {
        Self {
            pages: pages.max(1),
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            locality: 0.0,
            window: 8,
            seed: 42,
        }
    }

    /// Set page size (at least 1)
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set locality, clamped to [0.0, 1.0]
    #[must_use]
    pub fn with_locality(mut self, locality: f64) -> Self {
        self.locality = if locality.is_nan() {
            0.0
        } else {
            locality.clamp(0.0, 1.0)
        };
        self
    }

    /// Set the recent-page window (at least 1)
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Set RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate `length` addresses. Same settings, same trace.
    #[must_use]
    pub fn generate(&self, length: usize) -> Vec<VirtualAddress> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut recent: VecDeque<u64> = VecDeque::with_capacity(self.window);
        let mut addresses = Vec::with_capacity(length);

        for _ in 0..length {
            let page = if !recent.is_empty() && rng.gen::<f64>() < self.locality {
                recent[rng.gen_range(0..recent.len())]
            } else {
                let page = rng.gen_range(0..self.pages);
                if recent.len() == self.window {
                    recent.pop_front();
                }
                recent.push_back(page);
                page
            };
            let offset = rng.gen_range(0..self.page_size);
            addresses.push(page.saturating_mul(self.page_size).saturating_add(offset));
        }
        addresses
    }
}
