//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Criteria for the admin student listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Case-insensitive substring matched against name or email.
    pub search: Option<String>,
    /// Restrict to blocked (`true`) or active (`false`) accounts.
    pub blocked: Option<bool>,
}

impl StudentFilter {
    /// Trimmed, lower-cased search needle; blank input means no search.
    pub fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a student account satisfies the filter.
    pub fn matches(&self, user: &User) -> bool {
        let blocked_ok = self.blocked.is_none_or(|blocked| user.is_blocked == blocked);
        let search_ok = self.needle().is_none_or(|needle| {
            user.name.as_ref().to_lowercase().contains(&needle)
                || user.email.as_ref().contains(&needle)
        });
        blocked_ok && search_ok
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with `DuplicateEmail` when the
    /// normalised email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing account.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch every user whose id is listed; unknown ids are ignored.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;

    /// One page of students, newest first, with the filtered total.
    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), UserPersistenceError>;

    /// Every user, for aggregation snapshots.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Remove an account. Returns whether a row was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
