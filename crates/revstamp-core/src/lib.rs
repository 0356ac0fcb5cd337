#![deny(unsafe_code)]

//! revstamp core: build metadata and version resolution.
//!
//! Derives a short and a detailed version string for the running program
//! from build metadata embedded at compile time, falling back to
//! version-control information or a manually supplied override.
//!
//! ```ignore
//! use revstamp_core::{EmbeddedMetadata, VersionResolver};
//!
//! let version = VersionResolver::new(EmbeddedMetadata, "my-tool")
//!     .with_custom_version(Some("v2.6.2"))
//!     .resolve();
//! println!("{} ({})", version.simple, version.full);
//! ```

/// Compile-time build metadata (version, profile, override, embedded document).
pub mod build_info;
/// Dependency and build-setting records.
pub mod metadata;
/// The metadata source seam and its implementations.
pub mod provider;
/// Simple/full version resolution.
pub mod resolver;

pub use metadata::{BuildMetadata, BuildSetting, MetadataError, Module};
pub use provider::{EmbeddedMetadata, MetadataProvider, StaticMetadata};
pub use resolver::{ResolvedVersion, VersionResolver, resolve};
