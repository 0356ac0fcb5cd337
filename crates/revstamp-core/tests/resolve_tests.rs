//! End-to-end resolution tests against synthetic metadata fixtures.

use pretty_assertions::assert_eq;
use revstamp_core::{MetadataProvider, ResolvedVersion, StaticMetadata, VersionResolver};
use revstamp_test_utils::metadata::module;
use revstamp_test_utils::tracing_setup::init_test_tracing;
use revstamp_test_utils::{MetadataBuilder, TestConfigBuilder, TestConfigFile};

const IMPORT_PATH: &str = "revstamp-core";

fn resolve_with(provider: impl MetadataProvider, custom: Option<&str>) -> ResolvedVersion {
    VersionResolver::new(provider, IMPORT_PATH)
        .with_custom_version(custom)
        .resolve()
}

#[test]
fn test_outputs_never_empty() {
    init_test_tracing();

    let providers = [
        StaticMetadata::unavailable(),
        MetadataBuilder::new().provider(),
        MetadataBuilder::new().dependency(IMPORT_PATH, "", None).provider(),
        MetadataBuilder::new().dependency(IMPORT_PATH, "(devel)", None).provider(),
        MetadataBuilder::new().setting("vcs.revision", "").provider(),
        MetadataBuilder::new().vcs("zz", "not a time", false).provider(),
    ];
    for provider in providers {
        for custom in [None, Some(""), Some("v2.6.2")] {
            let resolved = resolve_with(provider.clone(), custom);
            assert!(!resolved.simple.is_empty(), "{provider:?} {custom:?}");
            assert!(!resolved.full.is_empty(), "{provider:?} {custom:?}");
        }
    }
}

#[test]
fn test_registry_dependency() {
    let provider = MetadataBuilder::new()
        .dependency("serde", "1.0.200", Some("sha256:00"))
        .dependency(IMPORT_PATH, "v2.1.0", Some("h1:abc="))
        .provider();

    let resolved = resolve_with(provider, None);
    assert_eq!(resolved.simple, "v2.1.0");
    assert_eq!(resolved.full, "v2.1.0 h1:abc=");
}

#[test]
fn test_replaced_dependency() {
    let provider = MetadataBuilder::new()
        .replaced_dependency(
            IMPORT_PATH,
            "v2.1.0",
            Some("h1:abc="),
            module("./local", "v2.1.0-dev", Some("h1:xyz=")),
        )
        .provider();

    let resolved = resolve_with(provider, None);
    assert_eq!(resolved.simple, "v2.1.0-dev_custom");
    assert!(resolved.full.contains(" => ./local"));
    assert!(resolved.full.ends_with(" h1:xyz="));
}

#[test]
fn test_vcs_fallback() {
    let provider = MetadataBuilder::new()
        .dependency("serde", "1.0.200", None)
        .vcs("abcdef1234567890", "2023-11-02T08:05:00Z", true)
        .provider();

    let resolved = resolve_with(provider, None);
    assert_eq!(resolved.simple, "abcdef12-20231102");
    assert_eq!(
        resolved.full,
        "abcdef1234567890+modified (02 Nov 23 08:05 UTC)"
    );
}

#[test]
fn test_resolution_is_repeatable() {
    let resolver = VersionResolver::new(
        MetadataBuilder::new()
            .vcs("abcdef1234567890", "2023-11-02T08:05:00Z", false)
            .provider(),
        IMPORT_PATH,
    );
    let first = resolver.resolve();
    assert_eq!(resolver.resolve(), first);
    assert_eq!(resolver.resolve(), first);
}

#[test]
fn test_config_override_and_import_path() {
    let config = TestConfigBuilder::new()
        .import_path("my-tool")
        .custom_version("v2.6.2")
        .build();
    let provider = MetadataBuilder::new()
        .dependency("my-tool", "v0.9.0", None)
        .provider();

    let resolved = VersionResolver::from_config(provider, &config).resolve();
    assert_eq!(resolved.simple, "v0.9.0");
    assert_eq!(resolved.full, "v2.6.2 v0.9.0");
}

#[tokio::test]
async fn test_config_file_drives_resolution() {
    let file = TestConfigFile::with_toml(
        "[version]\ncustom_version = \"v2.6.2\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .await;
    let config = file.load().await;

    let resolved = VersionResolver::from_config(StaticMetadata::unavailable(), &config).resolve();
    assert_eq!(
        resolved,
        ResolvedVersion {
            simple: "v2.6.2".to_string(),
            full: "v2.6.2".to_string(),
        }
    );
}

#[test]
fn test_trait_object_provider() {
    let provider: Box<dyn MetadataProvider> = Box::new(
        MetadataBuilder::new()
            .dependency(IMPORT_PATH, "v1.0.0", None)
            .provider(),
    );
    assert_eq!(resolve_with(provider, None).full, "v1.0.0");
}
