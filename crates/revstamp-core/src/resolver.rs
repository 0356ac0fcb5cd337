//! Version resolution.
//!
//! Derives a short ("simple") and a detailed ("full") version string from
//! build metadata, in priority order:
//!
//! 1. the program's own entry in the dependency list (version, checksum,
//!    replacement),
//! 2. version-control settings (revision, commit time, modified flag),
//! 3. the manually supplied override, or `"unknown"`.
//!
//! When an override is set it also prefixes any derived full version.
//! Resolution never fails: malformed or missing inputs degrade to the
//! fallbacks above.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use revstamp_config::AppConfig;
use serde::Serialize;
use tracing::debug;

use crate::build_info;
use crate::metadata::{BuildMetadata, Module, VCS_MODIFIED, VCS_REVISION, VCS_TIME};
use crate::provider::MetadataProvider;

/// Terminal fallback when nothing else is known.
pub const UNKNOWN: &str = "unknown";

/// Placeholder version reported for a program built from a local checkout.
pub const DEVEL_PLACEHOLDER: &str = "(devel)";

/// Suffix marking a simple version taken from a replacement module.
const CUSTOM_SUFFIX: &str = "_custom";

/// Date shown in the full version when no commit time was recorded.
const ZERO_TIME: &str = "01 Jan 01 00:00 UTC";

/// The resolved pair of version strings. Both are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    /// Short identifier, e.g. `v2.1.0` or `abcdef12-20240315`.
    pub simple: String,
    /// Detailed identifier including checksum or VCS provenance.
    pub full: String,
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Resolves version strings from a [`MetadataProvider`].
///
/// Nothing is cached: each call to [`resolve`](Self::resolve) reads the
/// provider again.
#[derive(Debug, Clone)]
pub struct VersionResolver<P> {
    provider: P,
    import_path: String,
    custom_version: Option<String>,
}

impl<P: MetadataProvider> VersionResolver<P> {
    /// Create a resolver that looks for `import_path` in the dependency list.
    pub fn new(provider: P, import_path: impl Into<String>) -> Self {
        Self {
            provider,
            import_path: import_path.into(),
            custom_version: None,
        }
    }

    /// Build a resolver from configuration. The compile-time override
    /// applies when the configuration does not set one.
    pub fn from_config(provider: P, config: &AppConfig) -> Self {
        let custom = config.custom_version().or(build_info::CUSTOM_VERSION);
        Self::new(provider, config.version.import_path.clone()).with_custom_version(custom)
    }

    /// Set the override. `None` and the empty string both mean unset.
    pub fn with_custom_version<S: Into<String>>(mut self, custom_version: Option<S>) -> Self {
        self.custom_version = custom_version.map(Into::into).filter(|v| !v.is_empty());
        self
    }

    /// The import path this resolver matches against.
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// The override in effect, if any.
    pub fn custom_version(&self) -> Option<&str> {
        self.custom_version.as_deref()
    }

    /// Resolve the simple and full version strings.
    pub fn resolve(&self) -> ResolvedVersion {
        let metadata = self.provider.build_metadata();
        resolve(
            metadata.as_ref(),
            &self.import_path,
            self.custom_version.as_deref(),
        )
    }
}

/// Resolve version strings from an optional metadata record.
///
/// `custom_version` is the manually supplied override; an empty string counts
/// as unset.
pub fn resolve(
    metadata: Option<&BuildMetadata>,
    import_path: &str,
    custom_version: Option<&str>,
) -> ResolvedVersion {
    let custom = custom_version.filter(|v| !v.is_empty());
    let fallback = || custom.unwrap_or(UNKNOWN).to_string();

    let Some(metadata) = metadata else {
        debug!("Build metadata unavailable, using fallback version");
        return ResolvedVersion {
            simple: fallback(),
            full: fallback(),
        };
    };

    let (mut simple, mut full) = match metadata.dependency(import_path) {
        Some(module) => {
            debug!(import_path, version = %module.version, "Version taken from dependency entry");
            describe_module(module)
        }
        None => (String::new(), String::new()),
    };

    if full.is_empty()
        && let Some(vcs) = VcsInfo::from_metadata(metadata)
    {
        debug!(revision = %vcs.revision, "Version taken from version-control settings");
        (simple, full) = vcs.describe();
    }

    full = match custom {
        Some(custom) if !full.is_empty() => format!("{custom} {full}"),
        _ if full.is_empty() => fallback(),
        _ => full,
    };

    if simple.is_empty() || simple == DEVEL_PLACEHOLDER {
        simple = fallback();
    }

    ResolvedVersion { simple, full }
}

/// Simple and full strings for a matched dependency entry.
fn describe_module(module: &Module) -> (String, String) {
    let mut simple = module.version.clone();
    let mut full = module.version.clone();

    if let Some(sum) = module.checksum() {
        full.push(' ');
        full.push_str(sum);
    }

    if let Some(replace) = module.replace.as_deref() {
        full.push_str(" => ");
        full.push_str(&replace.path);
        if !replace.version.is_empty() {
            simple = format!("{}{CUSTOM_SUFFIX}", replace.version);
            full.push(' ');
            full.push_str(replace.sum.as_deref().unwrap_or_default());
        }
    }

    (simple, full)
}

/// Version-control settings recorded at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VcsInfo {
    revision: String,
    time: Option<DateTime<FixedOffset>>,
    modified: bool,
}

impl VcsInfo {
    /// Extract VCS settings. `None` when no non-empty revision was recorded.
    /// An unparseable time reads as absent and an unparseable flag as false.
    fn from_metadata(metadata: &BuildMetadata) -> Option<Self> {
        let revision = metadata.setting(VCS_REVISION).filter(|r| !r.is_empty())?;
        let time = metadata
            .setting(VCS_TIME)
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok());
        let modified = metadata
            .setting(VCS_MODIFIED)
            .and_then(parse_bool)
            .unwrap_or(false);

        Some(Self {
            revision: revision.to_string(),
            time,
            modified,
        })
    }

    fn describe(&self) -> (String, String) {
        let mut full = self.revision.clone();
        if self.modified {
            full.push_str("+modified");
        }

        // Hex revisions are commit hashes; shorten them.
        let mut simple: String = if is_hex(&self.revision) {
            self.revision.chars().take(8).collect()
        } else {
            self.revision.clone()
        };

        let date = self.time.as_ref().map_or_else(|| ZERO_TIME.to_string(), rfc822);
        full.push_str(&format!(" ({date})"));

        if let Some(time) = self.time {
            simple.push_str(&format!("-{}", time.format("%Y%m%d")));
        }

        (simple, full)
    }
}

/// `DD Mon YY HH:MM ZONE` in the timestamp's own offset.
fn rfc822(time: &DateTime<FixedOffset>) -> String {
    let zone = if time.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        time.format("%z").to_string()
    };
    format!("{} {zone}", time.format("%d %b %y %H:%M"))
}

/// Whether `s` decodes as a hexadecimal byte string.
fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
