//! Inventory Reader
//!
//! Turns a host's raw inventory blob into a [`HostInventory`]. An empty or
//! unset blob and a malformed blob fail differently: the first means the
//! agent has not reported yet, the second that it reported garbage.

use super::model::{HostInventory, InventoryDocument};
use crate::domain::ClusterHost;
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Read the inventory of a host
///
/// Returns [`Error::InventoryMissing`] when the host has not reported an
/// inventory and [`Error::InventoryParse`] when the blob cannot be decoded.
pub fn read_inventory(host: &ClusterHost) -> Result<HostInventory> {
    let raw = match host.inventory.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            debug!("Empty inventory for host {}", host.id);
            return Err(Error::InventoryMissing {
                host: host.id.to_string(),
            });
        }
    };

    parse_inventory(raw).map_err(|e| {
        warn!("Failed to get inventory from host {}: {}", host.id, e);
        Error::InventoryParse {
            host: host.id.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Decode an inventory blob; the document must be a JSON object
pub fn parse_inventory(raw: &str) -> serde_json::Result<HostInventory> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(format!(
            "inventory must be a JSON object, got {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value::<InventoryDocument>(value).map(HostInventory::from)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Encode an inventory in the agent's wire format
pub fn encode_inventory(inventory: &HostInventory) -> Result<String> {
    Ok(serde_json::to_string(&InventoryDocument::from(inventory))?)
}
