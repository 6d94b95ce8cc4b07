//! Mode Resolver
//!
//! Picks the deployment mode the aggregated capacity supports. A compact
//! cluster is only ever checked against the compact bundle; larger clusters
//! try standard first and fall back to minimal.

use super::accumulator::ResourceTotals;
use crate::requirements::{RequirementsConfig, Thresholds, Topology};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Disks are provisioned in triples
pub const DISK_REPLICA_SET: u64 = 3;

// =============================================================================
// Deployment Mode
// =============================================================================

/// Deployment mode handed to manifest generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum DeploymentMode {
    Compact,
    Minimal,
    Standard,
    /// No mode resolved yet
    #[default]
    None,
}

impl From<Topology> for DeploymentMode {
    fn from(topology: Topology) -> Self {
        match topology {
            Topology::Compact => DeploymentMode::Compact,
            Topology::Standard => DeploymentMode::Standard,
            Topology::Minimal => DeploymentMode::Minimal,
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Compact => write!(f, "Compact"),
            DeploymentMode::Minimal => write!(f, "Minimal"),
            DeploymentMode::Standard => write!(f, "Standard"),
            DeploymentMode::None => write!(f, "None"),
        }
    }
}

// =============================================================================
// Shortfalls
// =============================================================================

/// One cluster-wide requirement the totals do not meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shortfall {
    CpuCores { required: u64 },
    Ram { required_gib: u64 },
    Disks { required: u64, min_size_gb: u64 },
    HostsWithDisks { required: u64 },
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shortfall::CpuCores { required } => {
                write!(f, "{} CPUs, excluding disk CPU resources", required)
            }
            Shortfall::Ram { required_gib } => {
                write!(f, "{} GiB RAM, excluding disk RAM resources", required_gib)
            }
            Shortfall::Disks {
                required,
                min_size_gb,
            } => write!(f, "{} disks of minimum {} GB", required, min_size_gb),
            Shortfall::HostsWithDisks { required } => write!(f, "{} hosts with disks", required),
        }
    }
}

/// Every requirement of a bundle the totals miss; empty means the bundle is met
pub fn shortfalls(totals: &ResourceTotals, thresholds: &Thresholds) -> Vec<Shortfall> {
    let mut missing = Vec::new();

    if totals.spare_cpu_cores < thresholds.min_cpu_cores {
        missing.push(Shortfall::CpuCores {
            required: thresholds.min_cpu_cores,
        });
    }
    if totals.spare_ram_bytes < thresholds.min_ram_bytes {
        missing.push(Shortfall::Ram {
            required_gib: thresholds.min_ram_gib(),
        });
    }
    if totals.disk_count < thresholds.min_disks {
        missing.push(Shortfall::Disks {
            required: thresholds.min_disks,
            min_size_gb: thresholds.min_disk_size_gb(),
        });
    }
    if totals.hosts_with_disks < thresholds.min_hosts_with_disks {
        missing.push(Shortfall::HostsWithDisks {
            required: thresholds.min_hosts_with_disks,
        });
    }

    missing
}

/// Whether the totals satisfy a bundle; no partial credit
pub fn meets(totals: &ResourceTotals, thresholds: &Thresholds) -> bool {
    shortfalls(totals, thresholds).is_empty()
}

/// Render the shortfall message for a topology
pub fn describe_shortfalls(topology: Topology, missing: &[Shortfall]) -> String {
    let items: Vec<String> = missing.iter().map(ToString::to_string).collect();
    format!(
        "Insufficient resources to deploy storage in {} mode. A minimum of {} is required.",
        topology,
        items.join(", ")
    )
}

// =============================================================================
// Resolution
// =============================================================================

/// Result of mode resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Resolved {
        mode: DeploymentMode,
        message: String,
    },
    Rejected {
        reasons: Vec<String>,
    },
}

/// Selects the deployment mode for aggregated totals
pub struct ModeResolver<'a> {
    config: &'a RequirementsConfig,
}

impl<'a> ModeResolver<'a> {
    pub fn new(config: &'a RequirementsConfig) -> Self {
        Self { config }
    }

    /// Resolve the mode for a cluster of `host_count` hosts
    pub fn resolve(&self, totals: &ResourceTotals, host_count: u64) -> Resolution {
        if !totals.insufficient_hosts.is_empty() {
            return Resolution::Rejected {
                reasons: totals
                    .insufficient_hosts
                    .iter()
                    .map(|msg| format!("{}.", msg))
                    .collect(),
            };
        }

        if totals.disk_count % DISK_REPLICA_SET != 0 {
            let min_size_gb = self.config.min_disk_size_gb;
            info!(
                "{} qualifying disks is not a multiple of {}",
                totals.disk_count, DISK_REPLICA_SET
            );
            return Resolution::Rejected {
                reasons: vec![format!(
                    "The number of disks in the cluster for storage must be a multiple of {} with a minimum size of {} GB",
                    DISK_REPLICA_SET, min_size_gb
                )],
            };
        }

        if self.config.is_compact(host_count) {
            return self.resolve_compact(totals);
        }

        self.resolve_worker_hosted(totals)
    }

    fn resolve_compact(&self, totals: &ResourceTotals) -> Resolution {
        let thresholds = self.config.thresholds_for(Topology::Compact);
        let missing = shortfalls(totals, &thresholds);
        if !missing.is_empty() {
            return Resolution::Rejected {
                reasons: vec![describe_shortfalls(Topology::Compact, &missing)],
            };
        }

        info!("Storage requirements for compact mode are satisfied");
        Resolution::Resolved {
            mode: DeploymentMode::Compact,
            message: "Storage requirements for Compact Mode are satisfied".to_string(),
        }
    }

    fn resolve_worker_hosted(&self, totals: &ResourceTotals) -> Resolution {
        let standard = self.config.thresholds_for(Topology::Standard);
        if meets(totals, &standard) {
            info!("Storage requirements for standard mode are satisfied");
            return Resolution::Resolved {
                mode: DeploymentMode::Standard,
                message: "Storage requirements for Standard Deployment are satisfied".to_string(),
            };
        }
        debug!("Standard thresholds not met, trying minimal");

        let minimal = self.config.thresholds_for(Topology::Minimal);
        let missing = shortfalls(totals, &minimal);
        if !missing.is_empty() {
            return Resolution::Rejected {
                reasons: vec![describe_shortfalls(Topology::Minimal, &missing)],
            };
        }

        info!("Storage requirements for minimal mode are satisfied");
        Resolution::Resolved {
            mode: DeploymentMode::Minimal,
            message: "Requirements for Storage Minimal Deployment are satisfied".to_string(),
        }
    }
}
