//! Requirement Thresholds
//!
//! Numeric policy for the storage add-on. Every value is configuration; the
//! engine never mutates it. Compact and standard deployments share one
//! cluster-wide bundle and differ only in the topology they apply to, so the
//! bundle for a topology is always built through
//! [`RequirementsConfig::thresholds_for`].

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Units
// =============================================================================

/// Bytes in a decimal gigabyte (disk sizes)
pub const BYTES_PER_GB: u64 = 1_000_000_000;

/// Bytes in a binary gibibyte (memory)
pub const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// MiB in a GiB
pub const MIB_PER_GIB: u64 = 1024;

/// Default node label selecting hosts for the storage add-on
pub const DEFAULT_STORAGE_LABEL: &str = "cluster.ocs.openshift.io/openshift-storage";

pub fn gb_to_bytes(gb: u64) -> u64 {
    gb.saturating_mul(BYTES_PER_GB)
}

pub fn gib_to_bytes(gib: u64) -> u64 {
    gib.saturating_mul(BYTES_PER_GIB)
}

pub fn gib_to_mib(gib: u64) -> u64 {
    gib.saturating_mul(MIB_PER_GIB)
}

// =============================================================================
// Topology
// =============================================================================

/// Threshold scale a cluster is evaluated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Exactly the minimum host count, every host doubling as master and storage
    Compact,
    /// Worker-hosted storage at full scale
    Standard,
    /// Worker-hosted storage at reduced scale
    Minimal,
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Compact => write!(f, "compact"),
            Topology::Standard => write!(f, "standard"),
            Topology::Minimal => write!(f, "minimal"),
        }
    }
}

// =============================================================================
// Thresholds
// =============================================================================

/// Resolved threshold bundle for one topology, all quantities in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub topology: Topology,
    /// Spare CPU cores required across the cluster
    pub min_cpu_cores: u64,
    /// Spare RAM required across the cluster
    pub min_ram_bytes: u64,
    /// Qualifying disks required across the cluster
    pub min_disks: u64,
    /// Hosts that must contribute at least one qualifying disk
    pub min_hosts_with_disks: u64,
    /// CPU cores each qualifying disk consumes on its host
    pub per_disk_cpu_cores: u64,
    /// RAM each qualifying disk consumes on its host
    pub per_disk_ram_bytes: u64,
    /// Smallest acceptable size for a qualifying disk
    pub min_disk_size_bytes: u64,
}

impl Thresholds {
    /// Spare RAM requirement in whole GiB, for messages
    pub fn min_ram_gib(&self) -> u64 {
        self.min_ram_bytes / BYTES_PER_GIB
    }

    /// Disk size policy in whole GB, for messages
    pub fn min_disk_size_gb(&self) -> u64 {
        self.min_disk_size_bytes / BYTES_PER_GB
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Cluster-wide CPU/RAM requirement of one threshold scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRequirements {
    pub cpu_cores: u64,
    pub ram_gib: u64,
}

impl ScaleRequirements {
    pub const COMPACT_STANDARD: Self = Self {
        cpu_cores: 30,
        ram_gib: 81,
    };

    pub const MINIMAL: Self = Self {
        cpu_cores: 18,
        ram_gib: 57,
    };
}

/// Scale as written in a policy file; unset fields keep the built-in value
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialScale {
    cpu_cores: Option<u64>,
    ram_gib: Option<u64>,
}

impl PartialScale {
    fn over(self, base: ScaleRequirements) -> ScaleRequirements {
        ScaleRequirements {
            cpu_cores: self.cpu_cores.unwrap_or(base.cpu_cores),
            ram_gib: self.ram_gib.unwrap_or(base.ram_gib),
        }
    }
}

fn compact_standard_scale<'de, D>(
    deserializer: D,
) -> std::result::Result<ScaleRequirements, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialScale::deserialize(deserializer)?.over(ScaleRequirements::COMPACT_STANDARD))
}

fn minimal_scale<'de, D>(deserializer: D) -> std::result::Result<ScaleRequirements, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialScale::deserialize(deserializer)?.over(ScaleRequirements::MINIMAL))
}

/// Per-host base requirement the add-on places on labeled hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PerHostRequirements {
    pub compact_cpu_cores: u64,
    pub compact_memory_gib: u64,
    pub standard_cpu_cores: u64,
    pub standard_memory_gib: u64,
}

impl Default for PerHostRequirements {
    fn default() -> Self {
        Self {
            compact_cpu_cores: 6,
            compact_memory_gib: 19,
            standard_cpu_cores: 8,
            standard_memory_gib: 19,
        }
    }
}

/// Complete storage add-on requirement policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementsConfig {
    /// Minimum host count; also the exact host count of a compact cluster
    pub required_hosts: u64,

    /// Minimum host count of a cluster with dedicated workers
    pub master_worker_hosts: u64,

    /// Cluster-wide spare capacity for compact and standard deployments
    /// (3 masters x 4 CPU + 3 x 6 storage CPU; 3 x 8 GiB + 57 GiB)
    #[serde(deserialize_with = "compact_standard_scale")]
    pub compact_standard: ScaleRequirements,

    /// Cluster-wide spare capacity for minimal deployments
    #[serde(deserialize_with = "minimal_scale")]
    pub minimal: ScaleRequirements,

    /// Minimum qualifying disks across the cluster
    pub min_disks: u64,

    /// CPU cores each qualifying disk needs
    pub per_disk_cpu_cores: u64,

    /// RAM in GiB each qualifying disk needs
    pub per_disk_ram_gib: u64,

    /// Minimum size of a disk counted by cluster-wide validation, decimal GB
    pub min_disk_size_gb: u64,

    /// Minimum size of a storage disk in per-host readiness and requirement
    /// checks, decimal GB; independent of `min_disk_size_gb`
    pub host_min_disk_size_gb: u64,

    /// Per-host base requirements for labeled hosts
    pub per_host: PerHostRequirements,

    /// Node label that selects hosts for the add-on
    pub storage_label: String,
}

impl Default for RequirementsConfig {
    fn default() -> Self {
        Self {
            required_hosts: 3,
            master_worker_hosts: 6,
            compact_standard: ScaleRequirements::COMPACT_STANDARD,
            minimal: ScaleRequirements::MINIMAL,
            min_disks: 3,
            per_disk_cpu_cores: 2,
            per_disk_ram_gib: 5,
            min_disk_size_gb: 5,
            host_min_disk_size_gb: 25,
            per_host: PerHostRequirements::default(),
            storage_label: DEFAULT_STORAGE_LABEL.to_string(),
        }
    }
}

impl RequirementsConfig {
    /// Build the threshold bundle for a topology
    pub fn thresholds_for(&self, topology: Topology) -> Thresholds {
        let scale = match topology {
            Topology::Compact | Topology::Standard => self.compact_standard,
            Topology::Minimal => self.minimal,
        };

        Thresholds {
            topology,
            min_cpu_cores: scale.cpu_cores,
            min_ram_bytes: gib_to_bytes(scale.ram_gib),
            min_disks: self.min_disks,
            min_hosts_with_disks: self.required_hosts,
            per_disk_cpu_cores: self.per_disk_cpu_cores,
            per_disk_ram_bytes: gib_to_bytes(self.per_disk_ram_gib),
            min_disk_size_bytes: gb_to_bytes(self.min_disk_size_gb),
        }
    }

    /// Whether a host count is the compact topology
    pub fn is_compact(&self, host_count: u64) -> bool {
        host_count == self.required_hosts
    }

    /// Reject policies the engine cannot evaluate meaningfully
    pub fn validate(&self) -> Result<()> {
        if self.required_hosts == 0 {
            return Err(Error::Configuration("requiredHosts must be greater than 0".into()));
        }

        if self.master_worker_hosts < self.required_hosts {
            return Err(Error::Configuration(format!(
                "masterWorkerHosts ({}) must not be below requiredHosts ({})",
                self.master_worker_hosts, self.required_hosts
            )));
        }

        if self.min_disks == 0 {
            return Err(Error::Configuration("minDisks must be greater than 0".into()));
        }

        if self.min_disk_size_gb == 0 {
            return Err(Error::Configuration("minDiskSizeGb must be greater than 0".into()));
        }

        if self.minimal.cpu_cores > self.compact_standard.cpu_cores
            || self.minimal.ram_gib > self.compact_standard.ram_gib
        {
            return Err(Error::Configuration(
                "minimal requirements must not exceed compact/standard requirements".into(),
            ));
        }

        if self.host_min_disk_size_gb == 0 {
            return Err(Error::Configuration("hostMinDiskSizeGb must be greater than 0".into()));
        }

        if self.storage_label.trim().is_empty() {
            return Err(Error::Configuration("storageLabel must not be empty".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RequirementsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_compact_and_standard_share_bundle() {
        let config = RequirementsConfig::default();
        let compact = config.thresholds_for(Topology::Compact);
        let standard = config.thresholds_for(Topology::Standard);

        assert_eq!(compact.min_cpu_cores, standard.min_cpu_cores);
        assert_eq!(compact.min_ram_bytes, standard.min_ram_bytes);
        assert_eq!(compact.min_cpu_cores, 30);
        assert_eq!(compact.min_ram_gib(), 81);
        assert_eq!(standard.topology, Topology::Standard);
    }

    #[test]
    fn test_minimal_bundle() {
        let thresholds = RequirementsConfig::default().thresholds_for(Topology::Minimal);
        assert_eq!(thresholds.min_cpu_cores, 18);
        assert_eq!(thresholds.min_ram_bytes, 57 * BYTES_PER_GIB);
        assert_eq!(thresholds.min_disks, 3);
        assert_eq!(thresholds.min_hosts_with_disks, 3);
        assert_eq!(thresholds.per_disk_cpu_cores, 2);
        assert_eq!(thresholds.per_disk_ram_bytes, 5 * BYTES_PER_GIB);
        assert_eq!(thresholds.min_disk_size_bytes, 5 * BYTES_PER_GB);
    }

    #[test]
    fn test_validate_rejects_inverted_scales() {
        let config = RequirementsConfig {
            minimal: ScaleRequirements {
                cpu_cores: 40,
                ram_gib: 57,
            },
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(Error::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_host_minimums() {
        let config = RequirementsConfig {
            master_worker_hosts: 2,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(Error::Configuration(_)));

        let config = RequirementsConfig {
            required_hosts: 0,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(Error::Configuration(_)));
    }

    #[test]
    fn test_disk_size_policies_are_independent() {
        let config = RequirementsConfig::default();
        assert_eq!(config.min_disk_size_gb, 5);
        assert_eq!(config.host_min_disk_size_gb, 25);

        let config = RequirementsConfig {
            host_min_disk_size_gb: 100,
            ..Default::default()
        };
        let thresholds = config.thresholds_for(Topology::Compact);
        assert_eq!(thresholds.min_disk_size_bytes, 5 * BYTES_PER_GB);
    }

    #[test]
    fn test_partial_scale_keeps_defaults() {
        let config: RequirementsConfig =
            serde_yaml::from_str("minimal:\n  cpuCores: 12\ncompactStandard: {}\n").unwrap();
        assert_eq!(config.minimal.cpu_cores, 12);
        assert_eq!(config.minimal.ram_gib, 57);
        assert_eq!(config.compact_standard, ScaleRequirements::COMPACT_STANDARD);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(gb_to_bytes(25), 25_000_000_000);
        assert_eq!(gib_to_bytes(1), 1_073_741_824);
        assert_eq!(gib_to_mib(19), 19_456);
    }
}
