//! Simulator configuration.
//!
//! A configuration is validated once, when the simulator is built. Nothing
//! is constructed from an invalid configuration.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default page size in bytes.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;
/// Default TLB capacity.
pub const DEFAULT_TLB_ENTRIES: usize = 16;
/// Default number of physical frames.
pub const DEFAULT_NUM_FRAMES: usize = 64;

/// Page replacement policy selection.
///
/// # Policy Recommendations
///
/// - **LRU**: exact recency, evicts the page least recently resolved
/// - **SecondChance**: clock approximation of LRU with one reference bit per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PolicyKind {
    /// Least Recently Used, driven by page table recency
    #[default]
    #[serde(rename = "LRU")]
    Lru,

    /// Second-Chance (clock)
    #[serde(rename = "SecondChance")]
    SecondChance,
}

impl PolicyKind {
    /// All supported policies, in report order.
    pub const ALL: [PolicyKind; 2] = [PolicyKind::Lru, PolicyKind::SecondChance];

    /// Canonical name, as printed in reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::SecondChance => "SecondChance",
        }
    }

    /// Get human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Lru => "Least Recently Used - evicts the least recently resolved page",
            Self::SecondChance => "Second-Chance clock - skips frames whose reference bit is set",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PolicyKind {
    type Error = SimError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "secondchance" | "second-chance" | "second_chance" | "clock" => {
                Ok(Self::SecondChance)
            }
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Sizing and policy parameters for a [`MemorySimulator`](crate::MemorySimulator).
///
/// # Example
///
/// ```
/// use aprender_vmsim::{PolicyKind, SimulatorConfig};
///
/// let config = SimulatorConfig::new()
///     .with_page_size(4096)
///     .with_tlb_entries(4)
///     .with_num_frames(8)
///     .with_policy(PolicyKind::SecondChance);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.replacement_policy.to_string(), "SecondChance");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Page size in bytes
    pub page_size: u64,
    /// TLB capacity in entries
    pub tlb_entries: usize,
    /// Number of physical frames
    pub num_frames: usize,
    /// Replacement policy used when frames are exhausted
    pub replacement_policy: PolicyKind,
    /// Emit a per-access trace at debug level
    pub debug: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            tlb_entries: DEFAULT_TLB_ENTRIES,
            num_frames: DEFAULT_NUM_FRAMES,
            replacement_policy: PolicyKind::default(),
            debug: false,
        }
    }
}

impl SimulatorConfig {
    /// Create a configuration with default sizes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set TLB capacity
    #[must_use]
    pub fn with_tlb_entries(mut self, tlb_entries: usize) -> Self {
        self.tlb_entries = tlb_entries;
        self
    }

    /// Set frame count
    #[must_use]
    pub fn with_num_frames(mut self, num_frames: usize) -> Self {
        self.num_frames = num_frames;
        self
    }

    /// Set replacement policy
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.replacement_policy = policy;
        self
    }

    /// Enable or disable the per-access debug trace
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check every sizing parameter is positive.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(SimError::invalid_config("page_size", self.page_size, "> 0"));
        }
        if self.tlb_entries == 0 {
            return Err(SimError::invalid_config(
                "tlb_entries",
                self.tlb_entries,
                "> 0",
            ));
        }
        if self.num_frames == 0 {
            return Err(SimError::invalid_config(
                "num_frames",
                self.num_frames,
                "> 0",
            ));
        }
        Ok(())
    }

    /// Parse a configuration from JSON text and validate it
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON (including unknown
    /// policy names) or a configuration error for non-positive sizes.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        // Surface a bad policy name as a configuration error, not a decode error
        if let Some(name) = value
            .get("replacement_policy")
            .and_then(serde_json::Value::as_str)
        {
            name.parse::<PolicyKind>()?;
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`SimulatorConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulatorConfig::default();
        assert_eq!(config.page_size, 4096);
        assert_eq!(config.tlb_entries, 16);
        assert_eq!(config.num_frames, 64);
        assert_eq!(config.replacement_policy, PolicyKind::Lru);
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SimulatorConfig::new()
            .with_page_size(512)
            .with_tlb_entries(2)
            .with_num_frames(3)
            .with_policy(PolicyKind::SecondChance)
            .with_debug(true);
        assert_eq!(config.page_size, 512);
        assert_eq!(config.tlb_entries, 2);
        assert_eq!(config.num_frames, 3);
        assert_eq!(config.replacement_policy, PolicyKind::SecondChance);
        assert!(config.debug);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let err = SimulatorConfig::new().with_page_size(0).validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));

        let err = SimulatorConfig::new().with_tlb_entries(0).validate().unwrap_err();
        assert!(err.to_string().contains("tlb_entries"));

        let err = SimulatorConfig::new().with_num_frames(0).validate().unwrap_err();
        assert!(err.to_string().contains("num_frames"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("LRU".parse::<PolicyKind>().unwrap(), PolicyKind::Lru);
        assert_eq!("lru".parse::<PolicyKind>().unwrap(), PolicyKind::Lru);
        assert_eq!(
            "SecondChance".parse::<PolicyKind>().unwrap(),
            PolicyKind::SecondChance
        );
        assert_eq!(
            "clock".parse::<PolicyKind>().unwrap(),
            PolicyKind::SecondChance
        );
        let err = "FIFO".parse::<PolicyKind>().unwrap_err();
        assert!(matches!(err, SimError::UnknownPolicy(ref name) if name == "FIFO"));
    }

    #[test]
    fn test_policy_display_roundtrips_through_from_str() {
        for policy in PolicyKind::ALL {
            assert_eq!(policy.to_string().parse::<PolicyKind>().unwrap(), policy);
            assert!(!policy.description().is_empty());
        }
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config =
            SimulatorConfig::from_json(r#"{"num_frames": 8, "replacement_policy": "SecondChance"}"#)
                .unwrap();
        assert_eq!(config.num_frames, 8);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.replacement_policy, PolicyKind::SecondChance);
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        let err = SimulatorConfig::from_json(r#"{"replacement_policy": "FIFO"}"#).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, SimError::UnknownPolicy(ref name) if name == "FIFO"));
    }

    #[test]
    fn test_from_json_accepts_every_policy_alias() {
        for (name, expected) in [
            ("lru", PolicyKind::Lru),
            ("Lru", PolicyKind::Lru),
            ("SECONDCHANCE", PolicyKind::SecondChance),
            ("second-chance", PolicyKind::SecondChance),
            ("second_chance", PolicyKind::SecondChance),
            ("Clock", PolicyKind::SecondChance),
        ] {
            let json = format!(r#"{{"replacement_policy": "{name}"}}"#);
            let config = SimulatorConfig::from_json(&json).unwrap();
            assert_eq!(config.replacement_policy, expected, "{name}");
        }
    }

    #[test]
    fn test_policy_deserializes_through_from_str() {
        let policy: PolicyKind = serde_json::from_str("\"second_chance\"").unwrap();
        assert_eq!(policy, PolicyKind::SecondChance);
        assert!(serde_json::from_str::<PolicyKind>("\"FIFO\"").is_err());
    }

    #[test]
    fn test_from_json_malformed_is_serialization_error() {
        let err = SimulatorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Serialization(_)));
    }

    #[test]
    fn test_from_json_rejects_zero_frames() {
        let err = SimulatorConfig::from_json(r#"{"num_frames": 0}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_json_serializes_policy_by_name() {
        let json = SimulatorConfig::new()
            .with_policy(PolicyKind::SecondChance)
            .to_json()
            .unwrap();
        assert!(json.contains("\"SecondChance\""));
        let back = SimulatorConfig::from_json(&json).unwrap();
        assert_eq!(back.replacement_policy, PolicyKind::SecondChance);
    }
}
