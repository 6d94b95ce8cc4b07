//! Host Requirements
//!
//! CPU and memory the storage add-on adds on top of a host's own needs,
//! and the preflight summary derived from configuration alone.

use crate::domain::{ClusterHost, HostRole};
use crate::error::{Error, Result};
use crate::feasibility::qualify_disks;
use crate::inventory::read_inventory;
use crate::requirements::{gb_to_bytes, gib_to_mib, RequirementsConfig};
use serde::Serialize;
use tracing::debug;

/// Resources the add-on reserves on one host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRequirements {
    pub cpu_cores: u64,
    pub ram_mib: u64,
}

impl HostRequirements {
    /// Base requirement plus the per-disk cost of `disks` storage disks
    fn with_disks(
        base_cpu: u64,
        base_ram_gib: u64,
        disks: u64,
        config: &RequirementsConfig,
    ) -> Self {
        Self {
            cpu_cores: base_cpu.saturating_add(disks.saturating_mul(config.per_disk_cpu_cores)),
            ram_mib: gib_to_mib(
                base_ram_gib.saturating_add(disks.saturating_mul(config.per_disk_ram_gib)),
            ),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cpu_cores == 0 && self.ram_mib == 0
    }
}

/// Requirements of the add-on on one host of a cluster with `cluster_size`
/// hosts. Missing inventory and undersized disks count as no disks; a
/// compact cluster reserves for at least one disk per storage host.
pub fn host_requirements(
    cluster_size: u64,
    host: &ClusterHost,
    config: &RequirementsConfig,
) -> Result<HostRequirements> {
    let disks = match read_inventory(host) {
        Ok(inventory) => qualify_disks(
            &inventory.disks,
            host.installation_disk_id.as_deref(),
            gb_to_bytes(config.host_min_disk_size_gb),
        )
        .unwrap_or_else(|undersized| {
            debug!("Ignoring disks of host {}: {}", host.id, undersized);
            0
        }),
        Err(Error::InventoryMissing { .. }) => 0,
        Err(e) => return Err(e),
    };

    if !host.has_label(&config.storage_label) {
        return Ok(HostRequirements::default());
    }

    let per_host = &config.per_host;
    let requirements = if cluster_size <= config.required_hosts {
        match host.role {
            HostRole::Master | HostRole::AutoAssign => HostRequirements::with_disks(
                per_host.compact_cpu_cores,
                per_host.compact_memory_gib,
                disks.max(1),
                config,
            ),
            HostRole::Worker => HostRequirements::with_disks(
                per_host.standard_cpu_cores,
                per_host.standard_memory_gib,
                disks.max(1),
                config,
            ),
        }
    } else {
        match host.role {
            HostRole::Master => HostRequirements::default(),
            HostRole::Worker | HostRole::AutoAssign => HostRequirements::with_disks(
                per_host.standard_cpu_cores,
                per_host.standard_memory_gib,
                disks,
                config,
            ),
        }
    };

    Ok(requirements)
}

// =============================================================================
// Preflight
// =============================================================================

/// Quantitative and qualitative requirements of one host role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequirements {
    pub quantitative: HostRequirements,
    pub qualitative: Vec<String>,
}

/// What an operator must provide before installing a cluster with storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightRequirements {
    pub master: RoleRequirements,
    pub worker: RoleRequirements,
}

/// Preflight requirements known from configuration alone
pub fn preflight_requirements(config: &RequirementsConfig) -> PreflightRequirements {
    let per_host = &config.per_host;
    let per_disk = format!(
        "Requirements per storage disk: {} CPUs, {} GiB RAM",
        config.per_disk_cpu_cores, config.per_disk_ram_gib
    );
    let disk_rule = format!(
        "Every storage disk must be an SSD or HDD of at least {} GB and not the installation disk",
        config.host_min_disk_size_gb
    );

    PreflightRequirements {
        master: RoleRequirements {
            quantitative: HostRequirements::with_disks(
                per_host.compact_cpu_cores,
                per_host.compact_memory_gib,
                0,
                config,
            ),
            qualitative: vec![
                format!(
                    "In compact mode ({} hosts), each host needs at least one non-bootable disk",
                    config.required_hosts
                ),
                per_disk.clone(),
                disk_rule.clone(),
            ],
        },
        worker: RoleRequirements {
            quantitative: HostRequirements::with_disks(
                per_host.standard_cpu_cores,
                per_host.standard_memory_gib,
                0,
                config,
            ),
            qualitative: vec![
                format!(
                    "Standard mode needs at least {} hosts with disks labeled {}",
                    config.required_hosts, config.storage_label
                ),
                per_disk,
                disk_rule,
            ],
        },
    }
}
