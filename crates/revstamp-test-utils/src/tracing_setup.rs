//! Tracing initialisation for tests.
//!
//! The resolver reports which source produced a version through `debug!`
//! events. [`init_test_tracing`] routes them to the test harness so they
//! show up next to a failing assertion.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "revstamp_core=debug,info";

/// Install a test-writer subscriber honouring `RUST_LOG`.
///
/// The subscriber is global, so only the first call in a process installs
/// it; later calls are no-ops.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
