//! Cluster Aggregator
//!
//! Decides which hosts count toward storage capacity and folds their
//! contributions into [`ResourceTotals`]. Every applicable host is evaluated
//! independently first; the fold runs afterwards in host order, so the
//! totals never depend on which host happened to fail first.

use super::accumulator::{assess_host, HostContribution, ResourceTotals};
use super::disks::{qualify_disks, UndersizedDisk};
use crate::domain::{ClusterHost, HostId, HostRole};
use crate::error::Error;
use crate::inventory::read_inventory;
use crate::requirements::{RequirementsConfig, Thresholds, Topology};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Topology Rejection
// =============================================================================

/// The cluster shape rules the add-on out before any host is inspected
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TopologyRejection {
    #[error("Insufficient hosts to deploy storage. A minimum of {required} hosts is required to deploy storage.")]
    InsufficientHosts { found: u64, required: u64 },

    #[error("Insufficient hosts for storage installation. A cluster with exactly {required} masters or with a minimum of {master_worker} hosts including {required} workers is required.")]
    UnsupportedHostCount {
        found: u64,
        required: u64,
        master_worker: u64,
    },

    #[error("All host roles must be assigned to enable storage.")]
    UnassignedRoles { hosts: Vec<HostId> },
}

// =============================================================================
// Host Issues
// =============================================================================

/// Data or policy problem that stops a host from being assessed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HostIssue {
    /// The host agent has not reported an inventory yet
    MissingInventory,
    /// The inventory blob could not be decoded
    MalformedInventory { reason: String },
    /// A candidate disk is below the size policy
    UndersizedDisk(UndersizedDisk),
}

impl HostIssue {
    /// Human-readable description naming the host
    pub fn describe(&self, host: &HostId) -> String {
        match self {
            HostIssue::MissingInventory => format!("Missing inventory in host {}", host),
            HostIssue::MalformedInventory { reason } => {
                format!("Failed to get inventory from host {}: {}", host, reason)
            }
            HostIssue::UndersizedDisk(undersized) => format!(
                "Insufficient resources to deploy storage on host {}: {}",
                host, undersized
            ),
        }
    }
}

/// Outcome of inspecting one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvaluation {
    Contribution(HostContribution),
    Issue(HostIssue),
}

// =============================================================================
// Aggregation
// =============================================================================

/// Cluster-wide totals plus every host that could not be assessed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Whether every host is treated as a storage host
    pub compact: bool,
    /// Hosts that were evaluated
    pub hosts_considered: u64,
    /// Folded totals of the assessable hosts
    pub totals: ResourceTotals,
    /// Hosts that could not be assessed, in host order; a repeated host ID
    /// keeps every entry
    pub issues: Vec<(HostId, HostIssue)>,
}

impl Aggregation {
    /// Hosts whose inventory has not arrived
    pub fn missing_hosts(&self) -> Vec<&HostId> {
        self.issues
            .iter()
            .filter(|(_, issue)| matches!(issue, HostIssue::MissingInventory))
            .map(|(host, _)| host)
            .collect()
    }

    /// Descriptions of malformed inventories and disk policy violations
    pub fn hard_failures(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|(_, issue)| !matches!(issue, HostIssue::MissingInventory))
            .map(|(host, issue)| issue.describe(host))
            .collect()
    }
}

/// Drives per-host evaluation over a cluster
pub struct ClusterAggregator<'a> {
    config: &'a RequirementsConfig,
}

impl<'a> ClusterAggregator<'a> {
    pub fn new(config: &'a RequirementsConfig) -> Self {
        Self { config }
    }

    /// Apply the host-count and role gates; returns whether the cluster is compact
    pub fn check_topology(&self, hosts: &[ClusterHost]) -> Result<bool, TopologyRejection> {
        let found = hosts.len() as u64;
        let required = self.config.required_hosts;
        let master_worker = self.config.master_worker_hosts;

        if found < required {
            info!("Storage requires {} hosts, cluster has {}", required, found);
            return Err(TopologyRejection::InsufficientHosts { found, required });
        }

        let compact = self.config.is_compact(found);
        if !compact {
            // Worker membership is undecidable while any role is open
            let unassigned: Vec<HostId> = hosts
                .iter()
                .filter(|h| h.role == HostRole::AutoAssign)
                .map(|h| h.id.clone())
                .collect();
            if !unassigned.is_empty() {
                info!("{} hosts have no role assigned", unassigned.len());
                return Err(TopologyRejection::UnassignedRoles { hosts: unassigned });
            }
        }

        if found > required && found < master_worker {
            info!(
                "Storage requires exactly {} or at least {} hosts, cluster has {}",
                required, master_worker, found
            );
            return Err(TopologyRejection::UnsupportedHostCount {
                found,
                required,
                master_worker,
            });
        }

        Ok(compact)
    }

    /// Hosts whose capacity counts toward storage
    pub fn storage_hosts<'h>(
        &self,
        hosts: &'h [ClusterHost],
        compact: bool,
    ) -> Vec<&'h ClusterHost> {
        hosts
            .iter()
            .filter(|h| compact || h.role == HostRole::Worker)
            .collect()
    }

    /// Evaluate and fold every storage host
    pub fn aggregate(&self, hosts: &[ClusterHost]) -> Result<Aggregation, TopologyRejection> {
        let compact = self.check_topology(hosts)?;
        let topology = if compact {
            Topology::Compact
        } else {
            Topology::Standard
        };
        let thresholds = self.config.thresholds_for(topology);

        let evaluations: Vec<(&HostId, HostEvaluation)> = self
            .storage_hosts(hosts, compact)
            .into_iter()
            .map(|host| (&host.id, evaluate_host(host, &thresholds)))
            .collect();

        let mut aggregation = Aggregation {
            compact,
            hosts_considered: evaluations.len() as u64,
            ..Default::default()
        };

        for (host, evaluation) in evaluations {
            match evaluation {
                HostEvaluation::Contribution(contribution) => {
                    if let HostContribution::Insufficient(insufficient) = &contribution {
                        info!("{}", insufficient);
                    }
                    aggregation.totals.fold(contribution);
                }
                HostEvaluation::Issue(issue) => {
                    if matches!(issue, HostIssue::MissingInventory) {
                        aggregation.totals.missing_inventory = true;
                    }
                    aggregation.issues.push((host.clone(), issue));
                }
            }
        }

        debug!(
            "Aggregated {} hosts: {} spare CPUs, {} GiB spare RAM, {} disks on {} hosts",
            aggregation.hosts_considered,
            aggregation.totals.spare_cpu_cores,
            aggregation.totals.spare_ram_gib(),
            aggregation.totals.disk_count,
            aggregation.totals.hosts_with_disks
        );

        Ok(aggregation)
    }
}

/// Inspect one host: read inventory, qualify disks, assess capacity
pub fn evaluate_host(host: &ClusterHost, thresholds: &Thresholds) -> HostEvaluation {
    let inventory = match read_inventory(host) {
        Ok(inventory) => inventory,
        Err(Error::InventoryMissing { .. }) => {
            return HostEvaluation::Issue(HostIssue::MissingInventory);
        }
        Err(Error::InventoryParse { reason, .. }) => {
            return HostEvaluation::Issue(HostIssue::MalformedInventory { reason });
        }
        Err(e) => {
            return HostEvaluation::Issue(HostIssue::MalformedInventory {
                reason: e.to_string(),
            });
        }
    };

    let disks = match qualify_disks(
        &inventory.disks,
        host.installation_disk_id.as_deref(),
        thresholds.min_disk_size_bytes,
    ) {
        Ok(disks) => disks,
        Err(undersized) => {
            warn!("Host {} rejected: {}", host.id, undersized);
            return HostEvaluation::Issue(HostIssue::UndersizedDisk(undersized));
        }
    };

    HostEvaluation::Contribution(assess_host(&host.id, &inventory, disks, thresholds))
}
