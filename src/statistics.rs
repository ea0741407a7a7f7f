//! Access counters and the textual statistics report.

use crate::config::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_HEAVY: &str = "============================================================";
const RULE_LIGHT: &str = "------------------------------------------------------------";

/// Counters accumulated by the access state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Accesses resolved by the TLB
    pub tlb_hits: u64,
    /// Accesses that missed the TLB
    pub tlb_misses: u64,
    /// Accesses whose page was not resident
    pub page_faults: u64,
    /// Faults that required evicting a resident page
    pub evictions: u64,
}

impl Statistics {
    /// Create zeroed counters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a TLB hit
    pub fn record_tlb_hit(&mut self) {
        self.tlb_hits += 1;
    }

    /// Record a TLB miss
    pub fn record_tlb_miss(&mut self) {
        self.tlb_misses += 1;
    }

    /// Record a page fault
    pub fn record_page_fault(&mut self) {
        self.page_faults += 1;
    }

    /// Record an eviction
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Total accesses processed
    #[must_use]
    pub fn accesses(&self) -> u64 {
        self.tlb_hits + self.tlb_misses
    }

    /// Get TLB hit rate (0.0 - 1.0)
    #[must_use]
    pub fn tlb_hit_rate(&self) -> f64 {
        ratio(self.tlb_hits, self.accesses())
    }

    /// Get page fault rate (0.0 - 1.0)
    #[must_use]
    pub fn page_fault_rate(&self) -> f64 {
        ratio(self.page_faults, self.accesses())
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Format an integer with `,` between thousands groups.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Snapshot of a simulator's configuration and counters, rendered as the
/// fixed-layout statistics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Configuration the counters were produced under
    pub config: SimulatorConfig,
    /// Counters
    pub statistics: Statistics,
}

impl StatisticsReport {
    /// Create a report
    #[must_use]
    pub fn new(config: SimulatorConfig, statistics: Statistics) -> Self {
        Self { config, statistics }
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.config;
        let stats = &self.statistics;
        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "SIMULADOR DE MEMÓRIA - Estatísticas de Acesso")?;
        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "Política de Substituição:   {}", config.replacement_policy)?;
        writeln!(f, "Tamanho da Página:          {} bytes", config.page_size)?;
        writeln!(f, "Entradas na TLB:            {}", config.tlb_entries)?;
        writeln!(f, "Número de Frames:           {}", config.num_frames)?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "TLB Hits:                   {}", group_thousands(stats.tlb_hits))?;
        writeln!(f, "TLB Misses:                 {}", group_thousands(stats.tlb_misses))?;
        writeln!(f, "Page Faults:                {}", group_thousands(stats.page_faults))?;
        writeln!(f, "{RULE_HEAVY}")
    }
}
