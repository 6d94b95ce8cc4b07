//! Cluster Hosts
//!
//! The engine's view of a cluster: an ordered list of hosts, each with the
//! role assigned by the cluster lifecycle manager and the raw inventory
//! reported by its agent. The engine only reads these values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Host Identity
// =============================================================================

/// Host identifier, unique within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HostId(pub String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for HostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Host Role
// =============================================================================

/// Role a host will take in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HostRole {
    Master,
    Worker,
    /// Not decided yet; the installer picks master or worker later
    #[default]
    AutoAssign,
}

impl std::fmt::Display for HostRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostRole::Master => write!(f, "master"),
            HostRole::Worker => write!(f, "worker"),
            HostRole::AutoAssign => write!(f, "auto-assign"),
        }
    }
}

// =============================================================================
// Cluster Host
// =============================================================================

/// A host as handed to the engine by the cluster lifecycle manager
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterHost {
    /// Host ID
    pub id: HostId,

    /// Assigned role
    #[serde(default)]
    pub role: HostRole,

    /// Identifier of the disk the operating system is installed on
    #[serde(default)]
    pub installation_disk_id: Option<String>,

    /// Raw inventory blob as reported by the host agent
    #[serde(default)]
    pub inventory: Option<String>,

    /// Node labels requested for the host
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ClusterHost {
    /// Create a host with no inventory yet
    pub fn new(id: impl Into<HostId>, role: HostRole) -> Self {
        Self {
            id: id.into(),
            role,
            installation_disk_id: None,
            inventory: None,
            labels: BTreeMap::new(),
        }
    }

    /// Attach a raw inventory blob
    pub fn with_inventory(mut self, inventory: impl Into<String>) -> Self {
        self.inventory = Some(inventory.into());
        self
    }

    /// Set the installation disk
    pub fn with_installation_disk(mut self, disk_id: impl Into<String>) -> Self {
        self.installation_disk_id = Some(disk_id.into());
        self
    }

    /// Add a node label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Whether the host carries the given label key
    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }
}

// =============================================================================
// Cluster Snapshot
// =============================================================================

/// Immutable snapshot of the hosts of one cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    /// Cluster name, used for logging only
    #[serde(default)]
    pub name: Option<String>,

    /// Hosts in the order the lifecycle manager lists them
    pub hosts: Vec<ClusterHost>,
}

impl ClusterSnapshot {
    pub fn new(hosts: Vec<ClusterHost>) -> Self {
        Self { name: None, hosts }
    }

    pub fn host_count(&self) -> u64 {
        self.hosts.len() as u64
    }

    /// Name to use in log lines
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
