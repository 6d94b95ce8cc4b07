//! Host fixtures shared by the feasibility tests

use crate::domain::{ClusterHost, HostRole};
use crate::inventory::{encode_inventory, Disk, DriveType, HostInventory};
use crate::requirements::BYTES_PER_GB;

pub const GIB: u64 = crate::requirements::BYTES_PER_GIB;

pub const BOOT_DISK: &str = "/dev/disk/by-id/boot";

/// Host with a 120 GB boot disk plus one SSD per entry of `disk_sizes_gb`
pub fn host_with_disks(
    id: &str,
    role: HostRole,
    cpu: u64,
    ram_gib: u64,
    disk_sizes_gb: &[u64],
) -> ClusterHost {
    let mut disks = vec![Disk::new(BOOT_DISK, DriveType::Hdd, 120 * BYTES_PER_GB)];
    disks.extend(disk_sizes_gb.iter().enumerate().map(|(i, size)| {
        Disk::new(
            format!("/dev/disk/by-id/data-{}", i),
            DriveType::Ssd,
            size * BYTES_PER_GB,
        )
    }));

    let inventory = HostInventory::new(cpu, ram_gib * GIB, disks);
    ClusterHost::new(id, role)
        .with_installation_disk(BOOT_DISK)
        .with_inventory(encode_inventory(&inventory).unwrap())
}
