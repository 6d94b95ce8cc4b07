//! Host Inventory Model
//!
//! Wire format of the inventory blob reported by a host agent and the
//! normalised [`HostInventory`] the engine works with.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Drive Type
// =============================================================================

/// Drive type tag as reported by the host agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriveType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    /// Optical, floppy, multipath, LVM, RAID, iSCSI and anything else
    #[default]
    #[serde(other)]
    Other,
}

impl DriveType {
    /// Whether disks of this type can back the storage add-on
    pub fn is_accepted(&self) -> bool {
        matches!(self, DriveType::Ssd | DriveType::Hdd)
    }
}

impl std::fmt::Display for DriveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveType::Ssd => write!(f, "SSD"),
            DriveType::Hdd => write!(f, "HDD"),
            DriveType::Other => write!(f, "other"),
        }
    }
}

// =============================================================================
// Disk
// =============================================================================

/// A block device found on a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    /// Host-scoped identifier (usually a /dev/disk/by-id path)
    #[serde(default)]
    pub id: String,

    /// Kernel name, e.g. sda
    #[serde(default)]
    pub name: String,

    /// Drive type tag
    #[serde(default)]
    pub drive_type: DriveType,

    /// Size in bytes
    #[serde(default, deserialize_with = "non_negative")]
    pub size_bytes: u64,
}

impl Disk {
    pub fn new(id: impl Into<String>, drive_type: DriveType, size_bytes: u64) -> Self {
        let id = id.into();
        let name = id.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            id,
            name,
            drive_type,
            size_bytes,
        }
    }
}

// =============================================================================
// Host Inventory
// =============================================================================

/// Hardware inventory of one host, normalised for capacity checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostInventory {
    /// CPU core count
    pub cpu_count: u64,
    /// Memory usable by the operating system, in bytes
    pub usable_memory_bytes: u64,
    /// Disks in the order the agent reported them
    pub disks: Vec<Disk>,
}

impl HostInventory {
    pub fn new(cpu_count: u64, usable_memory_bytes: u64, disks: Vec<Disk>) -> Self {
        Self {
            cpu_count,
            usable_memory_bytes,
            disks,
        }
    }
}

/// Raw inventory document; only the sections the engine reads are modelled
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct InventoryDocument {
    #[serde(default)]
    pub cpu: CpuSection,
    #[serde(default)]
    pub memory: MemorySection,
    #[serde(default)]
    pub disks: Vec<Disk>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct CpuSection {
    #[serde(default, deserialize_with = "non_negative")]
    pub count: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct MemorySection {
    #[serde(default, deserialize_with = "non_negative")]
    pub usable_bytes: u64,
}

impl From<InventoryDocument> for HostInventory {
    fn from(doc: InventoryDocument) -> Self {
        Self {
            cpu_count: doc.cpu.count,
            usable_memory_bytes: doc.memory.usable_bytes,
            disks: doc.disks,
        }
    }
}

impl From<&HostInventory> for InventoryDocument {
    fn from(inventory: &HostInventory) -> Self {
        Self {
            cpu: CpuSection {
                count: inventory.cpu_count,
            },
            memory: MemorySection {
                usable_bytes: inventory.usable_memory_bytes,
            },
            disks: inventory.disks.clone(),
        }
    }
}

/// Agents report sizes as signed integers; anything below zero means no capacity
fn non_negative<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Quantity::deserialize(deserializer)? {
        Quantity::Signed(v) => v.max(0) as u64,
        Quantity::Unsigned(v) => v,
    })
}
