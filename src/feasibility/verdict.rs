//! Verdict Builder
//!
//! Maps stage outcomes to a tri-state verdict. Missing inventory anywhere in
//! the run yields Pending, whatever else went wrong: the caller should wait
//! for the data rather than report a rejection.

use super::aggregator::{Aggregation, TopologyRejection};
use super::resolver::{DeploymentMode, Resolution};
use serde::Serialize;
use tracing::info;

/// Summary status of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Failure,
    Pending,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Success => write!(f, "success"),
            ValidationStatus::Failure => write!(f, "failure"),
            ValidationStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Outcome of a storage feasibility validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationVerdict {
    /// The add-on can be deployed in `mode`
    Success { mode: DeploymentMode, message: String },
    /// The add-on cannot be deployed; every known reason is listed
    Failure { reasons: Vec<String> },
    /// Not enough data to judge yet
    Pending { reason: String },
}

impl ValidationVerdict {
    pub fn status(&self) -> ValidationStatus {
        match self {
            ValidationVerdict::Success { .. } => ValidationStatus::Success,
            ValidationVerdict::Failure { .. } => ValidationStatus::Failure,
            ValidationVerdict::Pending { .. } => ValidationStatus::Pending,
        }
    }

    /// Single human-readable message
    pub fn message(&self) -> String {
        match self {
            ValidationVerdict::Success { message, .. } => message.clone(),
            ValidationVerdict::Failure { reasons } => reasons.join("\n"),
            ValidationVerdict::Pending { reason } => reason.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ValidationVerdict::Success { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ValidationVerdict::Pending { .. })
    }

    /// Resolved mode, only on success
    pub fn mode(&self) -> Option<DeploymentMode> {
        match self {
            ValidationVerdict::Success { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

/// Builds verdicts from each stage's outcome
pub struct VerdictBuilder;

impl VerdictBuilder {
    /// The cluster shape was rejected before any host was read
    pub fn from_topology(rejection: &TopologyRejection) -> ValidationVerdict {
        ValidationVerdict::Failure {
            reasons: vec![rejection.to_string()],
        }
    }

    /// Verdict forced by per-host issues, if any
    ///
    /// Missing inventory wins over everything; malformed inventories and
    /// disk policy violations come next.
    pub fn from_host_issues(aggregation: &Aggregation) -> Option<ValidationVerdict> {
        if aggregation.totals.missing_inventory {
            let missing: Vec<String> = aggregation
                .missing_hosts()
                .iter()
                .map(|h| h.to_string())
                .collect();
            info!("Missing inventory on hosts: {}", missing.join(", "));
            return Some(ValidationVerdict::Pending {
                reason: "Missing Inventory in some of the hosts".to_string(),
            });
        }

        let failures = aggregation.hard_failures();
        if !failures.is_empty() {
            return Some(ValidationVerdict::Failure { reasons: failures });
        }

        None
    }

    /// Verdict from mode resolution
    pub fn from_resolution(resolution: Resolution) -> ValidationVerdict {
        match resolution {
            Resolution::Resolved { mode, message } => ValidationVerdict::Success { mode, message },
            Resolution::Rejected { reasons } => ValidationVerdict::Failure { reasons },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostId;
    use crate::feasibility::aggregator::HostIssue;

    #[test]
    fn test_pending_dominates_failures() {
        let mut aggregation = Aggregation::default();
        aggregation.issues.push((
            HostId::from("h1"),
            HostIssue::MalformedInventory {
                reason: "bad".into(),
            },
        ));
        aggregation
            .issues
            .push((HostId::from("h2"), HostIssue::MissingInventory));
        aggregation.totals.missing_inventory = true;
        aggregation.totals.insufficient_hosts.push("short".into());

        let verdict = VerdictBuilder::from_host_issues(&aggregation).unwrap();
        assert_eq!(verdict.status(), ValidationStatus::Pending);
        assert!(verdict.message().contains("Missing Inventory"));
    }

    #[test]
    fn test_hard_failures_without_missing() {
        let mut aggregation = Aggregation::default();
        aggregation.issues.push((
            HostId::from("h1"),
            HostIssue::MalformedInventory {
                reason: "bad".into(),
            },
        ));

        let verdict = VerdictBuilder::from_host_issues(&aggregation).unwrap();
        assert_eq!(verdict.status(), ValidationStatus::Failure);
        assert_eq!(verdict.mode(), None);
    }

    #[test]
    fn test_clean_aggregation_defers_to_resolver() {
        assert!(VerdictBuilder::from_host_issues(&Aggregation::default()).is_none());
    }

    #[test]
    fn test_failure_message_joins_reasons() {
        let verdict = ValidationVerdict::Failure {
            reasons: vec!["first.".into(), "second.".into()],
        };
        assert_eq!(verdict.message(), "first.\nsecond.");
    }

    #[test]
    fn test_verdict_serializes_with_status_tag() {
        let verdict = ValidationVerdict::Success {
            mode: DeploymentMode::Compact,
            message: "ok".into(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["mode"], "Compact");
    }
}
