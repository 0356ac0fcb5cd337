//! Build-time metadata embedded by the build script.
//!
//! Provides the package version, build profile, the compile-time version
//! override and the serialized dependency/VCS metadata document.

use revstamp_config::AppConfig;

use crate::provider::EmbeddedMetadata;
use crate::resolver::{ResolvedVersion, VersionResolver};

/// The crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The build profile (`debug` or `release`).
pub const BUILD_PROFILE: &str = env!("REVSTAMP_BUILD_PROFILE");

/// This crate's identifier in a dependency list.
pub const IMPORT_PATH: &str = env!("CARGO_PKG_NAME");

/// Version override injected at build time through `REVSTAMP_CUSTOM_VERSION`.
///
/// Downstream packagers set this when no other version information is
/// available to them:
///
/// ```text
/// REVSTAMP_CUSTOM_VERSION=v2.6.2 cargo build --release
/// ```
pub const CUSTOM_VERSION: Option<&str> = option_env!("REVSTAMP_CUSTOM_VERSION");

/// JSON document describing dependencies and VCS state; `null` when the
/// build script found neither a lockfile nor a git checkout.
pub const EMBEDDED_METADATA: &str = include_str!(concat!(env!("OUT_DIR"), "/build_metadata.json"));

/// Resolve versions against the embedded metadata with default settings.
pub fn resolved() -> ResolvedVersion {
    VersionResolver::from_config(EmbeddedMetadata, &AppConfig::default()).resolve()
}

/// Return the full version string, e.g. `"v2.6.2 0123abcd… (15 Mar 24 10:30 UTC)"`.
pub fn version_string() -> String {
    resolved().full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_path_matches_config_default() {
        assert_eq!(IMPORT_PATH, revstamp_config::DEFAULT_IMPORT_PATH);
    }

    #[test]
    fn test_version_string_not_empty() {
        let resolved = resolved();
        assert!(!resolved.simple.is_empty());
        assert!(!resolved.full.is_empty());
        assert_eq!(version_string(), resolved.full);
    }

    #[test]
    fn test_build_profile() {
        // In test mode, profile is "debug"
        assert_eq!(BUILD_PROFILE, "debug");
    }
}
