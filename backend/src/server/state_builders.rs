//! Builders for repositories and the HTTP state handed to handlers.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use course_feedback::domain::ports::{BlobStore, PasswordHasher};
use course_feedback::domain::{
    AccountService, AnalyticsService, CourseService, FeedbackService, Repositories,
    UserAdminService,
};
use course_feedback::inbound::http::state::{HttpState, HttpStatePorts};
use course_feedback::outbound::blob_store::CapStdBlobStore;
use course_feedback::outbound::credentials::Argon2PasswordHasher;
use course_feedback::outbound::csv_export::CsvFeedbackExporter;
use course_feedback::outbound::memory::InMemoryStore;
use course_feedback::outbound::persistence::{
    DbPool, DieselCourseRepository, DieselFeedbackRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repositories over one shared in-process store.
pub(crate) fn in_memory_repositories() -> Repositories {
    let store = Arc::new(InMemoryStore::new());
    Repositories::new(store.clone(), store.clone(), store)
}

/// Repositories over a PostgreSQL pool.
pub(crate) fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselCourseRepository::new(pool.clone())),
        Arc::new(DieselFeedbackRepository::new(pool.clone())),
    )
}

/// Production password hasher.
pub(crate) fn password_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(Argon2PasswordHasher::new())
}

/// Wire every domain service onto the configured repositories.
///
/// # Errors
///
/// Returns the I/O error when the avatar directory cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let blobs: Arc<dyn BlobStore> = Arc::new(CapStdBlobStore::open(
        &config.avatars.dir,
        config.avatars.base_url.clone(),
    )?);
    Ok(web::Data::new(HttpState::new(
        service_ports(config, blobs, password_hasher()),
        config.limits,
    )))
}

fn service_ports(
    config: &ServerConfig,
    blobs: Arc<dyn BlobStore>,
    hasher: Arc<dyn PasswordHasher>,
) -> HttpStatePorts {
    let repos = config.repositories.clone();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = Arc::new(
        AccountService::new(repos.clone(), hasher, blobs, clock.clone())
            .with_max_avatar_bytes(config.limits.max_avatar_bytes),
    );
    let courses = Arc::new(
        CourseService::new(repos.clone(), clock.clone()).with_code_policy(config.code_policy),
    );
    let feedback = Arc::new(FeedbackService::new(
        repos.clone(),
        Arc::new(CsvFeedbackExporter),
        clock.clone(),
    ));
    let user_admin = Arc::new(UserAdminService::new(repos.clone()));
    let analytics =
        Arc::new(AnalyticsService::new(repos, clock).with_max_days(config.max_analytics_days));

    HttpStatePorts {
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
    }
}
