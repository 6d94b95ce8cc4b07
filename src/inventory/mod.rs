//! Inventory Module
//!
//! Host hardware inventory model and the reader that decodes agent blobs.

pub mod model;
pub mod reader;

pub use model::{Disk, DriveType, HostInventory};
pub use reader::*;
