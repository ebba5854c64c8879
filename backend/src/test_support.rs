//! Test utilities for integration suites.
//!
//! [`InMemoryStack`] wires the real services over the in-process store, a
//! throwaway avatar directory and a low-cost Argon2 hasher, so `tests/` can
//! drive the HTTP surface end to end without PostgreSQL.

use std::io;
use std::sync::Arc;

use actix_web::web;
use argon2::Params;
use chrono::Utc;
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

use crate::domain::ports::{BlobStore, PasswordHasher, UserPersistenceError};
use crate::domain::{
    AccountService, AnalyticsService, CourseService, Email, FeedbackService, NewPassword,
    Repositories, Role, User, UserAdminService, UserName,
};
use crate::inbound::http::state::{HttpLimits, HttpState, HttpStatePorts};
use crate::outbound::blob_store::CapStdBlobStore;
use crate::outbound::credentials::Argon2PasswordHasher;
use crate::outbound::csv_export::CsvFeedbackExporter;
use crate::outbound::memory::InMemoryStore;

/// Public URL prefix avatars are published under in tests.
pub const AVATAR_BASE_URL: &str = "/uploads/avatars";

/// Argon2id with minimal cost so suites that hash many passwords stay fast.
///
/// # Panics
///
/// Never in practice; the fixed parameters are within Argon2's bounds.
pub fn cheap_hasher() -> Arc<dyn PasswordHasher> {
    let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
    Arc::new(Argon2PasswordHasher::with_params(params))
}

/// Every service wired over one in-process store.
pub struct InMemoryStack {
    /// Repositories backing the services; tests may seed through them.
    pub repos: Repositories,
    /// Handler state ready for `App::app_data`.
    pub state: web::Data<HttpState>,
    hasher: Arc<dyn PasswordHasher>,
    avatars: TempDir,
}

impl InMemoryStack {
    /// Build the stack with default page limits.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the temporary avatar directory cannot be
    /// created or opened.
    pub fn new() -> io::Result<Self> {
        Self::with_limits(HttpLimits::default())
    }

    /// Build the stack with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the temporary avatar directory cannot be
    /// created or opened.
    pub fn with_limits(limits: HttpLimits) -> io::Result<Self> {
        let avatars = tempfile::tempdir()?;
        let blobs: Arc<dyn BlobStore> =
            Arc::new(CapStdBlobStore::open(avatars.path(), AVATAR_BASE_URL)?);
        let store = Arc::new(InMemoryStore::new());
        let repos = Repositories::new(store.clone(), store.clone(), store);
        let hasher = cheap_hasher();
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

        let accounts = Arc::new(
            AccountService::new(repos.clone(), hasher.clone(), blobs, clock.clone())
                .with_max_avatar_bytes(limits.max_avatar_bytes),
        );
        let courses = Arc::new(CourseService::new(repos.clone(), clock.clone()));
        let feedback = Arc::new(FeedbackService::new(
            repos.clone(),
            Arc::new(CsvFeedbackExporter),
            clock.clone(),
        ));
        let user_admin = Arc::new(UserAdminService::new(repos.clone()));
        let analytics = Arc::new(AnalyticsService::new(repos.clone(), clock));

        let ports = HttpStatePorts {
            login: accounts.clone(),
            profile: accounts.clone(),
            accounts,
            courses: courses.clone(),
            courses_query: courses,
            feedback: feedback.clone(),
            feedback_query: feedback,
            users: user_admin.clone(),
            user_admin,
            analytics,
        };

        Ok(Self {
            repos,
            state: web::Data::new(HttpState::new(ports, limits)),
            hasher,
            avatars,
        })
    }

    /// Insert an administrator; there is no HTTP route that creates one.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the email is already taken.
    ///
    /// # Panics
    ///
    /// Panics when the fixture name, email or password fails validation.
    pub async fn insert_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserPersistenceError> {
        let admin = User::new(
            UserName::new(name).expect("fixture admin name"),
            Email::new(email).expect("fixture admin email"),
            self.hasher
                .hash(&NewPassword::new(password).expect("fixture admin password"))
                .expect("fixture password hashes"),
            Role::Admin,
            Utc::now(),
        );
        self.repos.users.insert(&admin).await?;
        Ok(admin)
    }

    /// Directory avatars are written to.
    pub fn avatar_dir(&self) -> &std::path::Path {
        self.avatars.path()
    }
}
