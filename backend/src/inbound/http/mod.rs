//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API route lives under `/api/v1`. [`configure`] registers them along
//! with the extractor configurations that turn malformed input into the
//! shared error envelope. Session middleware and health probes are wired by
//! the server.

pub mod admin;
pub mod auth;
pub mod courses;
pub mod error;
pub mod feedback;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` scope on `cfg`.
///
/// Literal segments such as `/courses/stats` are registered before the
/// `{id}` routes that would otherwise capture them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(
            web::scope("/api/v1")
                .service(auth::register)
                .service(auth::login)
                .service(auth::admin_login)
                .service(auth::me)
                .service(auth::logout)
                .service(users::get_profile)
                .service(users::update_profile)
                .service(users::change_password)
                .service(users::upload_avatar)
                .service(courses::list_courses)
                .service(courses::courses_with_stats)
                .service(courses::create_course)
                .service(courses::get_course)
                .service(courses::update_course)
                .service(courses::delete_course)
                .service(feedback::create_feedback)
                .service(feedback::my_feedback)
                .service(feedback::list_feedback)
                .service(feedback::export_feedback)
                .service(feedback::feedback_stats)
                .service(feedback::update_feedback)
                .service(feedback::delete_feedback)
                .service(admin::dashboard)
                .service(admin::analytics)
                .service(admin::list_users)
                .service(admin::user_details)
                .service(admin::toggle_block)
                .service(admin::delete_user),
        );
}
