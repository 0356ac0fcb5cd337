//! Build metadata records: the dependency list and key/value build settings
//! captured when the program was compiled.

use serde::{Deserialize, Serialize};

/// Settings key holding the version-control revision identifier.
pub const VCS_REVISION: &str = "vcs.revision";
/// Settings key holding the commit timestamp (RFC 3339).
pub const VCS_TIME: &str = "vcs.time";
/// Settings key holding the "locally modified" flag.
pub const VCS_MODIFIED: &str = "vcs.modified";

/// Errors from decoding a serialized metadata document.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to decode build metadata: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Dependency and build-setting records for the running program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Dependencies the program was built with.
    #[serde(default)]
    pub deps: Vec<Module>,

    /// Key/value build settings, in the order they were recorded.
    #[serde(default)]
    pub settings: Vec<BuildSetting>,
}

/// A single dependency entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Import-path identifier (the package name for Cargo dependencies).
    pub path: String,

    /// Version string; may be empty.
    #[serde(default)]
    pub version: String,

    /// Content checksum, e.g. `sha256:<hex>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<String>,

    /// The module this dependency was substituted with at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<Box<Module>>,
}

/// A key/value build setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSetting {
    pub key: String,
    pub value: String,
}

impl BuildMetadata {
    /// Decode a JSON document. `null` decodes to `None` (metadata unavailable).
    pub fn from_json(text: &str) -> Result<Option<Self>, MetadataError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Find the dependency whose path equals `path`.
    pub fn dependency(&self, path: &str) -> Option<&Module> {
        self.deps.iter().find(|dep| dep.path == path)
    }

    /// Value of the setting `key`. When a key is recorded more than once, the
    /// last occurrence wins.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .rev()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }
}

impl Module {
    /// The checksum, if present and non-empty.
    pub fn checksum(&self) -> Option<&str> {
        self.sum.as_deref().filter(|s| !s.is_empty())
    }
}
