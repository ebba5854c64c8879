//! Administrator handlers: dashboard, analytics and the student directory.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! GET /api/v1/admin/analytics?period=7
//! GET /api/v1/admin/users?search=jane&blocked=false&page=1&limit=10
//! GET /api/v1/admin/users/{id}
//! PUT /api/v1/admin/users/{id}/toggle-block
//! DELETE /api/v1/admin/users/{id}
//! ```
//!
//! Role checks happen in the domain services; these handlers only resolve the
//! session and parse the request.

use actix_web::{HttpResponse, delete, get, put, web};
use pagination::Paginated;

use crate::domain::ports::{StudentSummary, UserDetails};
use crate::domain::{AnalyticsReport, DashboardSummary, Error, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::StudentPage;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, PeriodQuery, StudentFilterQuery};

/// Headline counters and the best-rated courses.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dashboardSummary"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardSummary>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state.analytics.dashboard(&requester).await.map(web::Json)
}

/// Registration and feedback trends over a trailing window.
#[utoipa::path(
    get,
    path = "/api/v1/admin/analytics",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Analytics report", body = AnalyticsReport),
        (status = 400, description = "Malformed period", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["admin"],
    operation_id = "analytics"
)]
#[get("/admin/analytics")]
pub async fn analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PeriodQuery>,
) -> ApiResult<web::Json<AnalyticsReport>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state
        .analytics
        .analytics(&requester, query.period)
        .await
        .map(web::Json)
}

/// Students with their feedback counts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(StudentFilterQuery, PageQuery),
    responses(
        (status = 200, description = "A page of students", body = StudentPage),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<StudentFilterQuery>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<StudentSummary>>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let filter = filter.parse()?;
    let page = state.listing_page(query.page, query.limit);
    state
        .users
        .list_students(&requester, &filter, page)
        .await
        .map(web::Json)
}

/// One account with its feedback history and statistics.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account details", body = UserDetails),
        (status = 400, description = "Malformed id", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["admin"],
    operation_id = "userDetails"
)]
#[get("/admin/users/{id}")]
pub async fn user_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDetails>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = UserId::parse(&path)?;
    state
        .users
        .user_details(&requester, &id)
        .await
        .map(web::Json)
}

/// Block an active student or unblock a blocked one.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/toggle-block",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Updated account", body = UserProfile),
        (status = 400, description = "Malformed id", body = Error),
        (status = 403, description = "Administrators only or target is an administrator", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["admin"],
    operation_id = "toggleUserBlock"
)]
#[put("/admin/users/{id}/toggle-block")]
pub async fn toggle_block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = UserId::parse(&path)?;
    state
        .user_admin
        .toggle_block(&requester, &id)
        .await
        .map(web::Json)
}

/// Remove a student together with their feedback.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 403, description = "Administrators only or target is an administrator", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = UserId::parse(&path)?;
    state.user_admin.delete_user(&requester, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
