//! Feasibility Module
//!
//! Decides whether the storage add-on can be deployed on a cluster and in
//! which mode.
//!
//! ```text
//!  hosts ──► ClusterAggregator ──► ModeResolver ──► VerdictBuilder
//!               │  per host:                          │
//!               │  read_inventory                     ▼
//!               │  qualify_disks              Success / Failure / Pending
//!               │  assess_host ─► ResourceTotals
//! ```

pub mod accumulator;
pub mod aggregator;
pub mod deployment;
pub mod disks;
pub mod resolver;
pub mod validator;
pub mod verdict;

#[cfg(test)]
pub(crate) mod testing;

pub use accumulator::*;
pub use aggregator::*;
pub use deployment::*;
pub use disks::*;
pub use resolver::*;
pub use validator::*;
pub use verdict::*;
