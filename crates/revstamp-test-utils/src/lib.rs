#![deny(unsafe_code)]

//! Shared test utilities for the revstamp workspace.
//!
//! Provides metadata fixtures, config builders, and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! revstamp-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod metadata;
pub mod tracing_setup;

pub use config::{TestConfigBuilder, TestConfigFile};
pub use metadata::MetadataBuilder;
