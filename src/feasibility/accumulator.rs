//! Per-Host Resource Accumulator
//!
//! Subtracts the CPU and RAM a host's qualifying disks consume and folds
//! what is left into cluster-wide totals. A host that cannot afford its own
//! disks is recorded as insufficient and contributes nothing.

use crate::domain::HostId;
use crate::inventory::HostInventory;
use crate::requirements::{Thresholds, BYTES_PER_GIB};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Host Contribution
// =============================================================================

/// A host whose disks need more CPU or RAM than it has
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error(
    "Insufficient resources on host {host} to deploy storage. The host has {disks} disks that require {required_cpu_cores} CPUs, {} GiB RAM",
    .required_ram_bytes / BYTES_PER_GIB
)]
pub struct InsufficientResources {
    pub host: HostId,
    pub disks: u64,
    pub required_cpu_cores: u64,
    pub required_ram_bytes: u64,
}

/// What one host adds to the cluster totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HostContribution {
    /// Residual capacity after disk overhead, and the disks that earned it
    Capacity {
        spare_cpu_cores: u64,
        spare_ram_bytes: u64,
        disks: u64,
    },
    /// The host cannot carry its own disks
    Insufficient(InsufficientResources),
}

/// Work out a host's contribution from its inventory and qualifying disks
pub fn assess_host(
    host: &HostId,
    inventory: &HostInventory,
    qualifying_disks: u64,
    thresholds: &Thresholds,
) -> HostContribution {
    if qualifying_disks == 0 {
        return HostContribution::Capacity {
            spare_cpu_cores: inventory.cpu_count,
            spare_ram_bytes: inventory.usable_memory_bytes,
            disks: 0,
        };
    }

    let required_cpu_cores = qualifying_disks.saturating_mul(thresholds.per_disk_cpu_cores);
    let required_ram_bytes = qualifying_disks.saturating_mul(thresholds.per_disk_ram_bytes);

    if inventory.cpu_count < required_cpu_cores
        || inventory.usable_memory_bytes < required_ram_bytes
    {
        return HostContribution::Insufficient(InsufficientResources {
            host: host.clone(),
            disks: qualifying_disks,
            required_cpu_cores,
            required_ram_bytes,
        });
    }

    HostContribution::Capacity {
        spare_cpu_cores: inventory.cpu_count - required_cpu_cores,
        spare_ram_bytes: inventory.usable_memory_bytes - required_ram_bytes,
        disks: qualifying_disks,
    }
}

// =============================================================================
// Resource Totals
// =============================================================================

/// Running cluster-wide totals of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceTotals {
    /// CPU cores left after disk overhead
    pub spare_cpu_cores: u64,
    /// RAM left after disk overhead
    pub spare_ram_bytes: u64,
    /// Qualifying disks
    pub disk_count: u64,
    /// Hosts contributing at least one qualifying disk
    pub hosts_with_disks: u64,
    /// One message per host that cannot carry its disks, in host order
    pub insufficient_hosts: Vec<String>,
    /// Set when some host has not reported its inventory
    pub missing_inventory: bool,
}

impl ResourceTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one host's contribution
    pub fn fold(&mut self, contribution: HostContribution) {
        match contribution {
            HostContribution::Capacity {
                spare_cpu_cores,
                spare_ram_bytes,
                disks,
            } => {
                self.spare_cpu_cores = self.spare_cpu_cores.saturating_add(spare_cpu_cores);
                self.spare_ram_bytes = self.spare_ram_bytes.saturating_add(spare_ram_bytes);
                if disks > 0 {
                    self.disk_count = self.disk_count.saturating_add(disks);
                    self.hosts_with_disks += 1;
                }
            }
            HostContribution::Insufficient(insufficient) => {
                self.insufficient_hosts.push(insufficient.to_string());
            }
        }
    }

    /// Spare RAM in whole GiB, for logging
    pub fn spare_ram_gib(&self) -> u64 {
        self.spare_ram_bytes / BYTES_PER_GIB
    }
}
