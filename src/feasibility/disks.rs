//! Disk Qualifier
//!
//! Counts the disks of a host that can back the storage add-on: accepted
//! drive type, not the installation disk. One undersized candidate rejects
//! the host's whole disk contribution.

use crate::inventory::Disk;
use crate::requirements::BYTES_PER_GB;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// A candidate disk below the minimum size policy
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error(
    "disk {disk_id} is {size_bytes} bytes; every storage disk must have a minimum size of {} GB",
    .min_size_bytes / BYTES_PER_GB
)]
pub struct UndersizedDisk {
    pub disk_id: String,
    pub size_bytes: u64,
    pub min_size_bytes: u64,
}

/// Whether a disk is a storage candidate on a host
pub fn is_candidate(disk: &Disk, installation_disk_id: Option<&str>) -> bool {
    if installation_disk_id.is_some_and(|boot| boot == disk.id) {
        return false;
    }
    // Agents report 0 when the size could not be read
    disk.drive_type.is_accepted() && disk.size_bytes != 0
}

/// Count the qualifying disks of a host
pub fn qualify_disks(
    disks: &[Disk],
    installation_disk_id: Option<&str>,
    min_disk_size_bytes: u64,
) -> Result<u64, UndersizedDisk> {
    let mut qualifying = 0u64;

    for disk in disks.iter().filter(|d| is_candidate(d, installation_disk_id)) {
        if disk.size_bytes < min_disk_size_bytes {
            debug!(
                "Disk {} ({} bytes) is below the {} byte minimum",
                disk.id, disk.size_bytes, min_disk_size_bytes
            );
            return Err(UndersizedDisk {
                disk_id: disk.id.clone(),
                size_bytes: disk.size_bytes,
                min_size_bytes: min_disk_size_bytes,
            });
        }
        qualifying += 1;
    }

    Ok(qualifying)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::DriveType;

    const MIN: u64 = 5 * BYTES_PER_GB;

    fn disks() -> Vec<Disk> {
        vec![
            Disk::new("/dev/sda", DriveType::Hdd, 120 * BYTES_PER_GB),
            Disk::new("/dev/sdb", DriveType::Ssd, 20 * BYTES_PER_GB),
            Disk::new("/dev/sdc", DriveType::Hdd, 40 * BYTES_PER_GB),
            Disk::new("/dev/sr0", DriveType::Other, 4 * BYTES_PER_GB),
        ]
    }

    #[test]
    fn test_installation_disk_excluded() {
        assert_eq!(qualify_disks(&disks(), Some("/dev/sda"), MIN), Ok(2));
        assert_eq!(qualify_disks(&disks(), None, MIN), Ok(3));
    }

    #[test]
    fn test_other_drive_types_ignored() {
        // sr0 is below the minimum but is never a candidate
        let result = qualify_disks(&disks(), Some("/dev/sda"), MIN);
        assert!(result.is_ok());
    }

    #[test]
    fn test_undersized_disk_rejects_host() {
        let mut host_disks = disks();
        host_disks.push(Disk::new("/dev/sdd", DriveType::Ssd, BYTES_PER_GB));

        let err = qualify_disks(&host_disks, Some("/dev/sda"), MIN).unwrap_err();
        assert_eq!(err.disk_id, "/dev/sdd");
        assert!(err.to_string().contains("minimum size of 5 GB"));
    }

    #[test]
    fn test_undersized_installation_disk_is_ignored() {
        let host_disks = vec![
            Disk::new("/dev/sda", DriveType::Ssd, BYTES_PER_GB),
            Disk::new("/dev/sdb", DriveType::Ssd, 20 * BYTES_PER_GB),
        ];
        assert_eq!(qualify_disks(&host_disks, Some("/dev/sda"), MIN), Ok(1));
    }

    #[test]
    fn test_zero_sized_disk_skipped() {
        let host_disks = vec![Disk::new("/dev/sdb", DriveType::Ssd, 0)];
        assert_eq!(qualify_disks(&host_disks, None, MIN), Ok(0));
    }

    #[test]
    fn test_no_disks_is_valid() {
        assert_eq!(qualify_disks(&[], None, MIN), Ok(0));
    }
}
