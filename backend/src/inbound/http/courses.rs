//! Course catalogue handlers.
//!
//! ```text
//! GET /api/v1/courses?page=1&limit=20
//! GET /api/v1/courses/stats
//! GET /api/v1/courses/{id}
//! POST /api/v1/courses {"name":"Algorithms","code":"cs301"}
//! PUT /api/v1/courses/{id} {"isActive":false}
//! DELETE /api/v1/courses/{id}
//! ```
//!
//! Students only see active courses; admins see every course and the
//! per-course statistics.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Paginated;

use crate::domain::{
    Course, CourseDetails, CourseDraft, CourseId, CoursePatch, CourseWithStats, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::CoursePage;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::PageQuery;

/// List courses by name.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of courses", body = CoursePage),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Course>>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let page = state.course_page(query.page, query.limit);
    state
        .courses_query
        .list(&requester, page)
        .await
        .map(web::Json)
}

/// Every course with its feedback count and average rating (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/courses/stats",
    responses(
        (status = 200, description = "Courses by feedback count", body = [CourseWithStats]),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["courses"],
    operation_id = "coursesWithStats"
)]
#[get("/courses/stats")]
pub async fn courses_with_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CourseWithStats>>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state
        .courses_query
        .with_stats(&requester)
        .await
        .map(web::Json)
}

/// One course; administrators also receive its statistics.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = CourseDetails),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such course", body = Error)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseDetails>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = CourseId::parse(&path)?;
    state
        .courses_query
        .get(&requester, &id)
        .await
        .map(web::Json)
}

/// Add a course (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CourseDraft,
    responses(
        (status = 201, description = "Created course", body = Course),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 409, description = "Name or code already used", body = Error)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CourseDraft>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let course = state.courses.create(&requester, &payload).await?;
    Ok(HttpResponse::Created().json(course))
}

/// Change any subset of a course's fields (admin only).
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = CoursePatch,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such course", body = Error),
        (status = 409, description = "Name or code already used", body = Error)
    ),
    tags = ["courses"],
    operation_id = "updateCourse"
)]
#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CoursePatch>,
) -> ApiResult<web::Json<Course>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = CourseId::parse(&path)?;
    state
        .courses
        .update(&requester, &id, &payload)
        .await
        .map(web::Json)
}

/// Remove a course that has no feedback (admin only).
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such course", body = Error),
        (status = 409, description = "Course still has feedback", body = Error)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = CourseId::parse(&path)?;
    state.courses.delete(&requester, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
