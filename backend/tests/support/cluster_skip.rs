//! Policy for suites that need an embedded PostgreSQL cluster.
//!
//! Bootstrapping downloads PostgreSQL binaries, which sandboxed runners cannot
//! always do. A failed bootstrap skips the suite with a `SKIP-TEST-CLUSTER`
//! marker unless `REQUIRE_TEST_CLUSTER` is truthy, in which case it fails so
//! CI breakage is not masked.

fn is_truthy(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Returns `None` after logging a skip marker, or panics when the cluster is required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if is_truthy("REQUIRE_TEST_CLUSTER") {
        panic!("Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
