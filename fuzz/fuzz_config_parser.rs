//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any accepted config must also pass its own validation again.
        if let Ok(config) = revstamp_config::AppConfig::parse(s) {
            assert!(config.validate().is_ok());
        }
    }
});
