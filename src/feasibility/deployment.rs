//! Per-cluster deployment state
//!
//! What manifest generation needs from a validation run. The caller owns
//! one of these per cluster and applies each outcome to it.

use super::resolver::DeploymentMode;
use super::validator::ValidationOutcome;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Disk count assumed before any validation succeeded
pub const DEFAULT_DISKS_AVAILABLE: u64 = 3;

/// Deployment mode and storage device count of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageDeployment {
    pub mode: DeploymentMode,
    pub disks_available: u64,
}

impl Default for StorageDeployment {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::None,
            disks_available: DEFAULT_DISKS_AVAILABLE,
        }
    }
}

impl StorageDeployment {
    /// Record a successful resolution; other outcomes leave the state alone.
    /// Returns whether anything changed.
    pub fn apply(&mut self, outcome: &ValidationOutcome) -> bool {
        let (Some(mode), Some(disks)) = (outcome.mode, outcome.disk_count) else {
            return false;
        };

        let changed = self.mode != mode || self.disks_available != disks;
        if changed {
            debug!("Storage deployment set to {} mode with {} disks", mode, disks);
        }
        self.mode = mode;
        self.disks_available = disks;
        changed
    }

    /// Whether a mode has been resolved
    pub fn is_resolved(&self) -> bool {
        self.mode != DeploymentMode::None
    }
}
