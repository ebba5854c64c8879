//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every handler under `/api/v1` plus the health probes.
//! Request and response bodies referenced by the handlers are collected
//! automatically; the pagination envelopes and the error payload are listed
//! explicitly because several handlers share them.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::{
    CoursePage, FeedbackPage, MyFeedbackPage, PageInfoSchema, StudentPage,
};
use crate::inbound::http::session::SESSION_COOKIE;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie issued by POST /api/v1/auth/login, /auth/admin-login or /auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Course feedback API",
        description = "Students rate the courses they attend; administrators manage the catalogue, accounts and analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::admin_login,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::upload_avatar,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::courses_with_stats,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::update_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::feedback::create_feedback,
        crate::inbound::http::feedback::my_feedback,
        crate::inbound::http::feedback::list_feedback,
        crate::inbound::http::feedback::export_feedback,
        crate::inbound::http::feedback::feedback_stats,
        crate::inbound::http::feedback::update_feedback,
        crate::inbound::http::feedback::delete_feedback,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::analytics,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::user_details,
        crate::inbound::http::admin::toggle_block,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PageInfoSchema,
        CoursePage,
        FeedbackPage,
        MyFeedbackPage,
        StudentPage
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and session lifecycle"),
        (name = "users", description = "The signed-in account's own profile"),
        (name = "courses", description = "Course catalogue"),
        (name = "feedback", description = "Course feedback submission and review"),
        (name = "admin", description = "Administrator dashboards and account management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
