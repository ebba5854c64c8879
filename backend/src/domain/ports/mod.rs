//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, credential hashing, blob storage, export)
//! describe what the domain needs from infrastructure. Each exposes a
//! strongly typed error generated by [`define_port_error!`]. Driving ports
//! are the use-cases inbound adapters call with an explicit
//! [`Requester`](crate::domain::Requester).

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod analytics_query;
mod blob_store;
mod course_command;
mod course_query;
mod course_repository;
mod feedback_command;
mod feedback_exporter;
mod feedback_query;
mod feedback_repository;
mod login_service;
mod password_hasher;
mod user_admin_command;
mod user_profile_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use analytics_query::MockAnalyticsQuery;
pub use analytics_query::AnalyticsQuery;
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError, ImageKind};
#[cfg(test)]
pub use course_command::MockCourseCommand;
pub use course_command::CourseCommand;
#[cfg(test)]
pub use course_query::MockCourseQuery;
pub use course_query::CourseQuery;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CourseRepository, CourseRepositoryError, CourseVisibility};
#[cfg(test)]
pub use feedback_command::MockFeedbackCommand;
pub use feedback_command::FeedbackCommand;
#[cfg(test)]
pub use feedback_exporter::MockFeedbackExporter;
pub use feedback_exporter::{FeedbackExportError, FeedbackExportRow, FeedbackExporter};
#[cfg(test)]
pub use feedback_query::MockFeedbackQuery;
pub use feedback_query::{FeedbackExport, FeedbackQuery};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{FeedbackRepository, FeedbackRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginScope, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_admin_command::MockUserAdminCommand;
pub use user_admin_command::UserAdminCommand;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StudentFilter, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{StudentSummary, UserDetails, UsersQuery};
