//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map
//! database failures onto the port error enums. Constraint violations
//! (duplicate email, course name or code, one submission per student and
//! course, restricted course deletion) are detected from the constraint
//! names declared in `backend/migrations`.
//!
//! # Example
//!
//! ```no_run
//! use course_feedback::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn wire() -> Result<(), course_feedback::outbound::persistence::PoolError> {
//! let url = "postgres://feedback@localhost/feedback";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_course_repository;
mod diesel_error_mapping;
mod diesel_feedback_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
