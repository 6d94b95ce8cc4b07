//! Host Validation
//!
//! Per-host readiness check for the storage add-on. Unlike the cluster-wide
//! validation it looks at one host in isolation: can this host, in its role,
//! take part in the deployment the cluster size implies.

use crate::domain::{ClusterHost, HostRole};
use crate::error::Error;
use crate::feasibility::{qualify_disks, ValidationStatus};
use crate::inventory::read_inventory;
use crate::requirements::{gb_to_bytes, RequirementsConfig};
use serde::Serialize;
use tracing::debug;

/// Reason attached to a storage-ready host that is not labeled for storage
pub const HOST_NOT_SELECTED: &str = "Host not selected for storage";

/// Verdict for a single host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostValidation {
    pub status: ValidationStatus,
    pub reasons: Vec<String>,
}

impl HostValidation {
    fn success() -> Self {
        Self {
            status: ValidationStatus::Success,
            reasons: Vec::new(),
        }
    }

    fn with_reason(status: ValidationStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reasons: vec![reason.into()],
        }
    }

    fn selected(host: &ClusterHost, config: &RequirementsConfig) -> Self {
        if host.has_label(&config.storage_label) {
            Self::success()
        } else {
            Self::with_reason(ValidationStatus::Success, HOST_NOT_SELECTED)
        }
    }
}

/// Validate one host of a cluster with `cluster_size` hosts
pub fn validate_host(
    cluster_size: u64,
    host: &ClusterHost,
    config: &RequirementsConfig,
) -> HostValidation {
    let inventory = match read_inventory(host) {
        Ok(inventory) => inventory,
        Err(Error::InventoryMissing { .. }) => {
            return HostValidation::with_reason(
                ValidationStatus::Pending,
                "Missing Inventory in host",
            );
        }
        Err(e) => {
            debug!("{}", e);
            return HostValidation::with_reason(
                ValidationStatus::Failure,
                "Failed to get inventory from host",
            );
        }
    };

    let disks = match qualify_disks(
        &inventory.disks,
        host.installation_disk_id.as_deref(),
        gb_to_bytes(config.host_min_disk_size_gb),
    ) {
        Ok(disks) => disks,
        Err(undersized) => {
            return HostValidation::with_reason(
                ValidationStatus::Failure,
                format!("Insufficient resources to deploy storage: {}", undersized),
            );
        }
    };

    if cluster_size <= config.required_hosts {
        match host.role {
            HostRole::Master | HostRole::AutoAssign if disks == 0 => HostValidation::with_reason(
                ValidationStatus::Failure,
                "In compact mode, storage requires at least one non-bootable disk on each host",
            ),
            HostRole::Master | HostRole::AutoAssign => HostValidation::selected(host, config),
            HostRole::Worker => HostValidation::with_reason(
                ValidationStatus::Failure,
                "In compact mode, host role must be master or auto-assign",
            ),
        }
    } else {
        match host.role {
            HostRole::AutoAssign => HostValidation::with_reason(
                ValidationStatus::Failure,
                "In standard mode, host role must be master or worker",
            ),
            HostRole::Master | HostRole::Worker => HostValidation::selected(host, config),
        }
    }
}
