//! Course feedback service library.
//!
//! Students rate the courses they attend; administrators curate the course
//! catalogue, manage accounts and read analytics. The crate follows a ports
//! and adapters layout:
//!
//! - [`domain`]: entities, services and the ports they depend on.
//! - [`inbound`]: the Actix HTTP adapter.
//! - [`outbound`]: PostgreSQL, in-process, credential, blob and export adapters.
//! - [`middleware`]: request-scoped concerns such as trace correlation.

pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
