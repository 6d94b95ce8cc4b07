//! Storage Validator
//!
//! Entry point of the engine. A run reads one immutable host list and
//! returns the verdict together with the resolved mode and disk count; it
//! writes nothing back, so concurrent runs for different clusters share no
//! state.

use super::accumulator::ResourceTotals;
use super::aggregator::ClusterAggregator;
use super::resolver::{DeploymentMode, ModeResolver};
use super::verdict::{ValidationStatus, ValidationVerdict, VerdictBuilder};
use crate::domain::{ClusterHost, ClusterSnapshot};
use crate::requirements::RequirementsConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Result of one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub verdict: ValidationVerdict,
    /// Resolved deployment mode, on success
    pub mode: Option<DeploymentMode>,
    /// Qualifying disks the storage cluster will use, on success
    pub disk_count: Option<u64>,
    /// Aggregated totals, when aggregation ran
    pub totals: Option<ResourceTotals>,
}

impl ValidationOutcome {
    fn rejected(verdict: ValidationVerdict, totals: Option<ResourceTotals>) -> Self {
        Self {
            verdict,
            mode: None,
            disk_count: None,
            totals,
        }
    }

    pub fn status(&self) -> ValidationStatus {
        self.verdict.status()
    }
}

/// Outcome stamped with the cluster and evaluation time, for reporting
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub cluster: String,
    pub host_count: u64,
    pub evaluated_at: DateTime<Utc>,
    pub outcome: ValidationOutcome,
}

/// Validates whether the storage add-on fits a cluster
#[derive(Debug, Clone, Default)]
pub struct StorageValidator {
    config: RequirementsConfig,
}

impl StorageValidator {
    pub fn new(config: RequirementsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RequirementsConfig {
        &self.config
    }

    /// Validate a host list
    pub fn validate(&self, hosts: &[ClusterHost]) -> ValidationOutcome {
        let host_count = hosts.len() as u64;
        let aggregator = ClusterAggregator::new(&self.config);

        let aggregation = match aggregator.aggregate(hosts) {
            Ok(aggregation) => aggregation,
            Err(rejection) => {
                info!("Storage requirements validation status: {}", rejection);
                return ValidationOutcome::rejected(VerdictBuilder::from_topology(&rejection), None);
            }
        };

        if let Some(verdict) = VerdictBuilder::from_host_issues(&aggregation) {
            info!(
                "Storage requirements validation status: {} ({})",
                verdict.status(),
                verdict.message()
            );
            return ValidationOutcome::rejected(verdict, Some(aggregation.totals));
        }

        let resolution = ModeResolver::new(&self.config).resolve(&aggregation.totals, host_count);
        let verdict = VerdictBuilder::from_resolution(resolution);
        info!(
            "Storage requirements validation status: {} ({})",
            verdict.status(),
            verdict.message()
        );

        match verdict.mode() {
            Some(mode) => ValidationOutcome {
                mode: Some(mode),
                disk_count: Some(aggregation.totals.disk_count),
                totals: Some(aggregation.totals),
                verdict,
            },
            None => ValidationOutcome::rejected(verdict, Some(aggregation.totals)),
        }
    }

    /// Validate a snapshot and stamp the result
    pub fn report(&self, snapshot: &ClusterSnapshot) -> ValidationReport {
        info!(
            "Validating storage requirements for cluster {} ({} hosts)",
            snapshot.display_name(),
            snapshot.host_count()
        );
        ValidationReport {
            cluster: snapshot.display_name().to_string(),
            host_count: snapshot.host_count(),
            evaluated_at: Utc::now(),
            outcome: self.validate(&snapshot.hosts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostRole;
    use crate::feasibility::testing::host_with_disks;
    use assert_matches::assert_matches;

    fn validator() -> StorageValidator {
        StorageValidator::new(RequirementsConfig::default())
    }

    fn compact_cluster() -> Vec<ClusterHost> {
        (0..3)
            .map(|i| host_with_disks(&format!("master-{}", i), HostRole::Master, 16, 64, &[20, 40]))
            .collect()
    }

    fn standard_cluster(worker_cpu: u64, worker_ram_gib: u64, disks: &[u64]) -> Vec<ClusterHost> {
        let mut hosts: Vec<_> = (0..3)
            .map(|i| host_with_disks(&format!("master-{}", i), HostRole::Master, 8, 32, &[]))
            .collect();
        hosts.extend((0..3).map(|i| {
            host_with_disks(
                &format!("worker-{}", i),
                HostRole::Worker,
                worker_cpu,
                worker_ram_gib,
                disks,
            )
        }));
        hosts
    }

    #[test]
    fn test_compact_success() {
        let outcome = validator().validate(&compact_cluster());

        assert_eq!(outcome.status(), ValidationStatus::Success);
        assert_eq!(outcome.mode, Some(DeploymentMode::Compact));
        assert_eq!(outcome.disk_count, Some(6));
        let totals = outcome.totals.unwrap();
        assert_eq!(totals.hosts_with_disks, 3);
        assert_eq!(totals.spare_cpu_cores, 36);
    }

    #[test]
    fn test_two_hosts_fail() {
        let hosts = &compact_cluster()[..2];
        let outcome = validator().validate(hosts);

        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome.verdict.message().contains("minimum of 3 hosts"));
        assert_eq!(outcome.mode, None);
        assert_eq!(outcome.disk_count, None);
        assert!(outcome.totals.is_none());
    }

    #[test]
    fn test_fewer_than_three_hosts_always_fail() {
        for n in 0..3 {
            let hosts = &compact_cluster()[..n];
            assert_eq!(validator().validate(hosts).status(), ValidationStatus::Failure);
        }
    }

    #[test]
    fn test_missing_inventory_pending() {
        let mut hosts = compact_cluster();
        hosts[1].inventory = Some(String::new());

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Pending);
        assert!(outcome.verdict.message().contains("Missing Inventory"));
        assert_eq!(outcome.mode, None);
    }

    #[test]
    fn test_missing_inventory_overrides_other_failures() {
        let mut hosts = compact_cluster();
        hosts[0] = host_with_disks("master-0", HostRole::Master, 1, 1, &[20, 40]);
        hosts[1].inventory = Some("not json".into());
        hosts[2].inventory = None;

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Pending);
    }

    #[test]
    fn test_malformed_inventory_fails() {
        let mut hosts = compact_cluster();
        hosts[2].inventory = Some("[1, 2".into());

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome.verdict.message().contains("master-2"));
    }

    #[test]
    fn test_non_object_inventory_fails_naming_host() {
        let mut hosts = compact_cluster();
        hosts[1].inventory = Some("[]".into());

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        let message = outcome.verdict.message();
        assert!(message.starts_with("Failed to get inventory from host master-1"));
        assert!(!message.contains("multiple of 3"));
    }

    #[test]
    fn test_undersized_worker_disk_fails() {
        let mut hosts = standard_cluster(32, 128, &[100]);
        hosts[4] = host_with_disks("worker-1", HostRole::Worker, 32, 128, &[100, 2]);

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        let message = outcome.verdict.message();
        assert!(message.contains("worker-1"));
        assert!(message.contains("minimum size of 5 GB"));
    }

    #[test]
    fn test_auto_assign_in_four_hosts_fails() {
        let mut hosts = compact_cluster();
        hosts.push(host_with_disks("extra", HostRole::AutoAssign, 16, 64, &[20]));

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome
            .verdict
            .message()
            .to_lowercase()
            .contains("all host roles must be assigned"));
    }

    #[test]
    fn test_four_assigned_hosts_fail_host_count() {
        let mut hosts = compact_cluster();
        hosts.push(host_with_disks("extra", HostRole::Worker, 16, 64, &[20]));

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome.verdict.message().contains("Insufficient hosts"));
    }

    #[test]
    fn test_auto_assign_in_standard_cluster_fails() {
        let mut hosts = standard_cluster(32, 128, &[100]);
        hosts[0].role = HostRole::AutoAssign;

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome
            .verdict
            .message()
            .to_lowercase()
            .contains("all host roles must be assigned"));
    }

    #[test]
    fn test_standard_success() {
        let outcome = validator().validate(&standard_cluster(16, 64, &[100]));
        assert_eq!(outcome.mode, Some(DeploymentMode::Standard));
        assert_eq!(outcome.disk_count, Some(3));
    }

    #[test]
    fn test_minimal_success() {
        // 3 x (8 - 2) = 18 CPUs, 3 x (24 - 5) = 57 GiB
        let outcome = validator().validate(&standard_cluster(8, 24, &[100]));
        assert_eq!(outcome.mode, Some(DeploymentMode::Minimal));
        assert!(outcome.verdict.message().contains("Minimal"));
    }

    #[test]
    fn test_worker_shortfall_reported_against_minimal() {
        let outcome = validator().validate(&standard_cluster(4, 16, &[100]));
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        assert!(outcome.verdict.message().contains("minimal mode"));
    }

    #[test]
    fn test_host_short_on_disk_cpu_contributes_nothing() {
        let mut hosts = compact_cluster();
        // Plenty of RAM but 4 disks need 8 CPUs
        hosts[0] = host_with_disks("master-0", HostRole::Master, 6, 512, &[20, 20, 20, 20]);

        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.status(), ValidationStatus::Failure);
        let totals = outcome.totals.unwrap();
        assert_eq!(totals.insufficient_hosts.len(), 1);
        assert_eq!(totals.disk_count, 4);
        assert_eq!(totals.hosts_with_disks, 2);
        assert!(outcome.verdict.message().contains("master-0"));
    }

    #[test]
    fn test_disk_total_sums_hosts() {
        let hosts = vec![
            host_with_disks("m0", HostRole::Master, 32, 128, &[20]),
            host_with_disks("m1", HostRole::Master, 32, 128, &[20, 20]),
            host_with_disks("m2", HostRole::Master, 32, 128, &[20, 20, 20]),
        ];
        let outcome = validator().validate(&hosts);
        assert_eq!(outcome.disk_count, Some(6));
    }

    #[test]
    fn test_disk_count_not_multiple_of_three_fails() {
        let hosts = vec![
            host_with_disks("m0", HostRole::Master, 32, 128, &[20]),
            host_with_disks("m1", HostRole::Master, 32, 128, &[20]),
            host_with_disks("m2", HostRole::Master, 32, 128, &[20, 20]),
        ];
        let outcome = validator().validate(&hosts);
        assert_matches!(outcome.verdict, ValidationVerdict::Failure { ref reasons }
            if reasons[0].contains("multiple of 3"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let hosts = standard_cluster(16, 64, &[100]);
        let before = format!("{:?}", hosts);

        let validator = validator();
        let first = validator.validate(&hosts);
        let second = validator.validate(&hosts);

        assert_eq!(first, second);
        assert_eq!(before, format!("{:?}", hosts));
    }

    #[test]
    fn test_host_order_does_not_change_totals() {
        let mut hosts = vec![
            host_with_disks("m0", HostRole::Master, 16, 64, &[20]),
            host_with_disks("m1", HostRole::Master, 24, 96, &[20, 40]),
            host_with_disks("m2", HostRole::Master, 32, 128, &[]),
        ];
        let forward = validator().validate(&hosts);
        hosts.reverse();
        let backward = validator().validate(&hosts);

        assert_eq!(forward.totals, backward.totals);
        assert_eq!(forward.verdict, backward.verdict);
    }

    #[test]
    fn test_report_names_cluster() {
        let snapshot = ClusterSnapshot {
            name: Some("edge-1".into()),
            hosts: compact_cluster(),
        };
        let report = validator().report(&snapshot);
        assert_eq!(report.cluster, "edge-1");
        assert_eq!(report.host_count, 3);
        assert!(report.outcome.verdict.is_success());
    }
}
