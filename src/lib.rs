//! Storage Add-on Validator - Feasibility and Deployment Mode Resolution
//!
//! Decides whether a hyper-converged storage add-on can be deployed on a
//! cluster, and in which mode (Compact, Standard or Minimal), from the
//! hardware inventory each host reports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                            Storage Validator                                │
//! ├─────────────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────────┐  │
//! │  │    Topology     │  │   Per-host      │  │      Mode Resolver          │  │
//! │  │    Checks       │  │   Accumulator   │  │  (Compact/Standard/Minimal) │  │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────┬───────────────┘  │
//! │           │                    │                         │                  │
//! │           └────────────────────┼─────────────────────────┘                  │
//! │                                │                                            │
//! │                    ┌───────────┴───────────┐                                │
//! │                    │   Verdict Builder     │                                │
//! │                    │Success/Failure/Pending│                                │
//! │                    └───────────────────────┘                                │
//! ├─────────────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────┐  ┌─────────────────────────────────────┐   │
//! │  │   Inventory Reader          │  │   Requirements Config               │   │
//! │  │   (host JSON documents)     │  │   (thresholds, per-host costs)      │   │
//! │  └─────────────────────────────┘  └─────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`feasibility`]: Cluster-wide validation and mode resolution
//! - [`host`]: Per-host readiness and resource requirements
//! - [`inventory`]: Host hardware inventory model and decoding
//! - [`requirements`]: Requirement policy, thresholds and config loading
//! - [`domain`]: Cluster and host types
//! - [`error`]: Error types and handling

pub mod domain;
pub mod error;
pub mod feasibility;
pub mod host;
pub mod inventory;
pub mod requirements;

// Re-export commonly used types
pub use domain::{ClusterHost, ClusterSnapshot, HostId, HostRole};

pub use error::{Error, ErrorAction, Result};

pub use feasibility::{
    DeploymentMode, ResourceTotals, StorageDeployment, StorageValidator, ValidationOutcome,
    ValidationReport, ValidationStatus, ValidationVerdict,
};

pub use host::{
    host_requirements, preflight_requirements, validate_host, HostRequirements, HostValidation,
    PreflightRequirements,
};

pub use inventory::{Disk, DriveType, HostInventory};

pub use requirements::{ConfigLoader, RequirementsConfig, Thresholds, Topology};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
