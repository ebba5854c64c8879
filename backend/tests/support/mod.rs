//! Shared helpers for the PostgreSQL-backed integration suites.
//!
//! Each integration test compiles as its own crate, so suites pull these in
//! with `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_database;
