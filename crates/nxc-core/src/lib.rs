//! Shared building blocks for the `nxc` Nextcloud client crates.
//!
//! Holds the pieces every other crate depends on without pulling in any
//! protocol code: error types, configuration loading, logging bootstrap,
//! route constants and the fixed status-code tables.

pub mod codes;
pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
