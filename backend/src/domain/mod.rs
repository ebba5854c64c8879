//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities (users, courses, feedback),
//! the ports that adapters implement, and the services that enforce access
//! and consistency rules. Nothing here depends on HTTP or a database driver.
//!
//! Public surface:
//! - Entities and value types: [`User`], [`Course`], [`Feedback`] and their
//!   validated fields.
//! - Aggregation: [`FeedbackSnapshot`] and the statistics it produces.
//! - Services: [`AccountService`], [`CourseService`], [`FeedbackService`],
//!   [`UserAdminService`], [`AnalyticsService`].
//! - Errors: [`Error`] with a stable [`ErrorCode`].

pub mod account;
mod account_service;
pub mod analytics;
mod analytics_service;
pub mod auth;
pub mod course;
mod course_service;
pub mod error;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod feedback;
mod feedback_service;
pub mod ids;
pub mod ports;
mod service_support;
#[cfg(test)]
pub(crate) mod service_test_helpers;
mod trace_id;
pub mod user;
mod user_admin_service;
mod validation;

pub use self::account::{
    AvatarUpload, PasswordChange, ProfileChanges, ProfilePatch, Registration, ValidPasswordChange,
    ValidRegistration,
};
pub use self::account_service::{AccountService, DEFAULT_MAX_AVATAR_BYTES};
pub use self::analytics::{
    AnalyticsReport, CourseRanking, CourseStats, CourseWithStats, DailyCount, DailyRating,
    DashboardSummary, FeedbackSnapshot, GlobalFeedbackStats, RatingCount, StudentFeedbackStats,
    course_stats, student_feedback_stats,
};
pub use self::analytics_service::{AnalyticsService, DEFAULT_MAX_ANALYTICS_DAYS};
pub use self::auth::{LoginCredentials, LoginValidationError, Requester};
pub use self::course::{
    CodeEditPolicy, Course, CourseChanges, CourseCode, CourseDetails, CourseDraft, CourseName,
    CoursePatch, CourseValidationError, Credits, NewCourse,
};
pub use self::course_service::CourseService;
pub use self::error::{Error, ErrorCode};
pub use self::feedback::{
    CourseRef, Feedback, FeedbackChanges, FeedbackDraft, FeedbackFilter, FeedbackMessage,
    FeedbackPatch, FeedbackValidationError, FeedbackView, FeedbackWithCourse, NewFeedback, Rating,
    StudentRef,
};
pub use self::feedback_service::FeedbackService;
pub use self::ids::{CourseId, FeedbackId, UserId};
pub use self::service_support::Repositories;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Address, Email, NewPassword, PasswordHash, PhoneNumber, Role, UnknownRole, User, UserName,
    UserProfile, UserValidationError,
};
pub use self::user_admin_service::UserAdminService;
pub use self::validation::{FieldErrors, FieldViolation};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use course_feedback::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
