//! Shared Diesel error classification for the repositories.
//!
//! Each repository turns a [`DbFailure`] into its own port error; keeping the
//! Diesel matching here means constraint names are inspected in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique index on `LOWER(users.email)`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `courses.name`.
pub(crate) const COURSES_NAME_KEY: &str = "courses_name_key";
/// Unique constraint on `courses.code`.
pub(crate) const COURSES_CODE_KEY: &str = "courses_code_key";
/// Unique constraint on `feedback (student_id, course_id)`.
pub(crate) const FEEDBACK_STUDENT_COURSE_KEY: &str = "feedback_student_course_key";
/// Restricting foreign key from feedback to courses.
pub(crate) const FEEDBACK_COURSE_FKEY: &str = "feedback_course_id_fkey";

/// A database failure reduced to what the repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection was lost or could not be obtained.
    Connection(String),
    /// A unique constraint rejected the write.
    Unique { constraint: Option<String> },
    /// A foreign key rejected the write or delete.
    ForeignKey { constraint: Option<String> },
    /// Any other failure.
    Query(String),
}

impl DbFailure {
    /// Whether this is a unique violation on `constraint`.
    pub(crate) fn is_unique(&self, constraint: &str) -> bool {
        matches!(self, Self::Unique { constraint: Some(name) } if name == constraint)
    }

    /// Whether this is a foreign key violation on `constraint`.
    pub(crate) fn is_foreign_key(&self, constraint: &str) -> bool {
        matches!(self, Self::ForeignKey { constraint: Some(name) } if name == constraint)
    }

    /// Message for failures that fall back to a generic query error.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message.clone(),
            Self::Unique { constraint } => {
                format!("unique violation on {}", constraint.as_deref().unwrap_or("unknown"))
            }
            Self::ForeignKey { constraint } => {
                format!("foreign key violation on {}", constraint.as_deref().unwrap_or("unknown"))
            }
        }
    }
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(
                    ?kind,
                    message = info.message(),
                    constraint = ?info.constraint_name(),
                    "diesel operation failed"
                );
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(kind, info) => {
                let constraint = info.constraint_name().map(str::to_owned);
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::Unique { constraint },
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKey { constraint },
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            _ => Self::Query("database error".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_are_connection_failures() {
        let failure = DbFailure::from(PoolError::checkout("timed out"));
        assert_eq!(failure, DbFailure::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert!(matches!(
            DbFailure::from(DieselError::NotFound),
            DbFailure::Query(_)
        ));
    }

    #[rstest]
    fn constraint_predicates_match_by_name() {
        let failure = DbFailure::Unique {
            constraint: Some(USERS_EMAIL_KEY.to_owned()),
        };
        assert!(failure.is_unique(USERS_EMAIL_KEY));
        assert!(!failure.is_unique(COURSES_NAME_KEY));
        assert!(!failure.is_foreign_key(USERS_EMAIL_KEY));
    }
}
