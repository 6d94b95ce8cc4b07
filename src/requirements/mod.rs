//! Requirements Module
//!
//! Threshold policy for the storage add-on and the loader that reads it.

pub mod loader;
pub mod thresholds;

pub use loader::*;
pub use thresholds::*;
