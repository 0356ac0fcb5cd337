//! Fuzz target for metadata decoding and version resolution.
//!
//! Run with: cargo +nightly fuzz run fuzz_resolve
//!
//! Decodes arbitrary bytes as a metadata document and resolves it. Whatever
//! the input, both version strings must come out non-empty.

#![no_main]

use libfuzzer_sys::fuzz_target;
use revstamp_core::{BuildMetadata, resolve};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(metadata) = BuildMetadata::from_json(text) else {
        return;
    };
    for custom in [None, Some("v2.6.2")] {
        let resolved = resolve(metadata.as_ref(), "revstamp-core", custom);
        assert!(!resolved.simple.is_empty());
        assert!(!resolved.full.is_empty());
    }
});
