//! Build metadata fixtures.
//!
//! [`MetadataBuilder`] assembles [`BuildMetadata`] records the way the build
//! script would, so resolver tests don't depend on the real lockfile or git
//! state of the checkout.

use revstamp_core::metadata::{VCS_MODIFIED, VCS_REVISION, VCS_TIME};
use revstamp_core::{BuildMetadata, BuildSetting, Module, StaticMetadata};

/// Fluent builder for [`BuildMetadata`].
///
/// # Example
///
/// ```ignore
/// let provider = MetadataBuilder::new()
///     .dependency("revstamp-core", "v2.1.0", Some("h1:abc="))
///     .vcs("abcdef1234567890", "2024-03-15T10:30:00Z", true)
///     .provider();
/// ```
#[derive(Default)]
pub struct MetadataBuilder {
    metadata: BuildMetadata,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency entry.
    pub fn dependency(mut self, path: &str, version: &str, sum: Option<&str>) -> Self {
        self.metadata.deps.push(module(path, version, sum));
        self
    }

    /// Add a dependency entry substituted by `replacement`.
    pub fn replaced_dependency(
        mut self,
        path: &str,
        version: &str,
        sum: Option<&str>,
        replacement: Module,
    ) -> Self {
        let mut dep = module(path, version, sum);
        dep.replace = Some(Box::new(replacement));
        self.metadata.deps.push(dep);
        self
    }

    /// Add a raw build setting.
    pub fn setting(mut self, key: &str, value: &str) -> Self {
        self.metadata.settings.push(BuildSetting {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Add the three version-control settings.
    pub fn vcs(self, revision: &str, time: &str, modified: bool) -> Self {
        self.setting(VCS_REVISION, revision)
            .setting(VCS_TIME, time)
            .setting(VCS_MODIFIED, &modified.to_string())
    }

    pub fn build(self) -> BuildMetadata {
        self.metadata
    }

    /// Wrap the record in a provider.
    pub fn provider(self) -> StaticMetadata {
        StaticMetadata::available(self.metadata)
    }
}

/// A module record, for use as a replacement.
pub fn module(path: &str, version: &str, sum: Option<&str>) -> Module {
    Module {
        path: path.to_string(),
        version: version.to_string(),
        sum: sum.map(str::to_string),
        replace: None,
    }
}
