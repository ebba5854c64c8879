//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used when no database is configured
//! - **credentials**: Argon2id password hashing
//! - **blob_store**: avatar images in a capability-scoped directory
//! - **csv_export**: feedback export rendering
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod blob_store;
pub mod credentials;
pub mod csv_export;
pub mod memory;
pub mod persistence;
