//! Sources of build metadata.
//!
//! The resolver only needs one capability from its environment: hand over
//! the dependency and build-setting records, or report that there are none.
//! [`MetadataProvider`] is that seam. [`EmbeddedMetadata`] reads what the
//! build script compiled into the binary; [`StaticMetadata`] serves a fixed
//! record, which is what tests and embedding applications use.

use tracing::warn;

use crate::build_info;
use crate::metadata::BuildMetadata;

/// Supplies build metadata to the resolver.
pub trait MetadataProvider: Send + Sync {
    /// The metadata record, or `None` when no metadata is available.
    fn build_metadata(&self) -> Option<BuildMetadata>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn build_metadata(&self) -> Option<BuildMetadata> {
        (**self).build_metadata()
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn build_metadata(&self) -> Option<BuildMetadata> {
        (**self).build_metadata()
    }
}

/// Metadata embedded into the binary by the build script.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedMetadata;

impl MetadataProvider for EmbeddedMetadata {
    fn build_metadata(&self) -> Option<BuildMetadata> {
        match BuildMetadata::from_json(build_info::EMBEDDED_METADATA) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(error = %e, "Embedded build metadata is unreadable, treating as unavailable");
                None
            }
        }
    }
}

/// A fixed metadata record.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    metadata: Option<BuildMetadata>,
}

impl StaticMetadata {
    /// Serve the given record.
    pub fn available(metadata: BuildMetadata) -> Self {
        Self {
            metadata: Some(metadata),
        }
    }

    /// Report metadata as unavailable.
    pub fn unavailable() -> Self {
        Self { metadata: None }
    }
}

impl From<Option<BuildMetadata>> for StaticMetadata {
    fn from(metadata: Option<BuildMetadata>) -> Self {
        Self { metadata }
    }
}

impl MetadataProvider for StaticMetadata {
    fn build_metadata(&self) -> Option<BuildMetadata> {
        self.metadata.clone()
    }
}
