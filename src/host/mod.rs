//! Host Module
//!
//! Per-host checks: readiness of a single host and the resources the
//! storage add-on reserves on it.

pub mod requirements;
pub mod validation;

pub use requirements::*;
pub use validation::*;
