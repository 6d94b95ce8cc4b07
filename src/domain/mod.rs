//! Domain layer - cluster and host types shared by every stage

pub mod host;

pub use host::*;
