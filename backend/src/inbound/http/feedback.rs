//! Feedback handlers.
//!
//! ```text
//! POST /api/v1/feedback {"courseId":"...","rating":5,"message":"Clear lectures and fair labs."}
//! GET /api/v1/feedback/mine?page=1
//! GET /api/v1/feedback/all?course=...&rating=4&student=...&page=1&limit=10
//! GET /api/v1/feedback/export?rating=1
//! GET /api/v1/feedback/stats
//! PUT /api/v1/feedback/{id} {"rating":4}
//! DELETE /api/v1/feedback/{id}
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::Paginated;

use crate::domain::{
    Error, FeedbackDraft, FeedbackId, FeedbackPatch, FeedbackView, FeedbackWithCourse,
    GlobalFeedbackStats,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{FeedbackPage, MyFeedbackPage};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FeedbackFilterQuery, PageQuery};

/// Submit feedback for a course (students only, once per course).
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    request_body = FeedbackDraft,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackView),
        (status = 400, description = "Invalid rating or message", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Blocked or not a student", body = Error),
        (status = 404, description = "No such course", body = Error),
        (status = 409, description = "Feedback already submitted", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "createFeedback"
)]
#[post("/feedback")]
pub async fn create_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FeedbackDraft>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let view = state.feedback.create(&requester, &payload).await?;
    Ok(HttpResponse::Created().json(view))
}

/// The signed-in student's own feedback, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/feedback/mine",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of feedback", body = MyFeedbackPage),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "myFeedback"
)]
#[get("/feedback/mine")]
pub async fn my_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<FeedbackWithCourse>>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let page = state.listing_page(query.page, query.limit);
    state
        .feedback_query
        .mine(&requester, page)
        .await
        .map(web::Json)
}

/// Every feedback entry matching the filters (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/feedback/all",
    params(FeedbackFilterQuery, PageQuery),
    responses(
        (status = 200, description = "A page of feedback", body = FeedbackPage),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback/all")]
pub async fn list_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<FeedbackFilterQuery>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<FeedbackView>>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let filter = filter.parse()?;
    let page = state.listing_page(query.page, query.limit);
    state
        .feedback_query
        .list_all(&requester, &filter, page)
        .await
        .map(web::Json)
}

/// Download every matching feedback entry (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/feedback/export",
    params(FeedbackFilterQuery),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv", body = String,
            headers(("Content-Disposition" = String, description = "attachment; filename=..."))),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "exportFeedback"
)]
#[get("/feedback/export")]
pub async fn export_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<FeedbackFilterQuery>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let filter = filter.parse()?;
    let export = state.feedback_query.export(&requester, &filter).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export.file_name)],
    };
    Ok(HttpResponse::Ok()
        .content_type(export.content_type)
        .insert_header(disposition)
        .body(export.bytes))
}

/// Platform-wide feedback statistics (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/feedback/stats",
    responses(
        (status = 200, description = "Statistics", body = GlobalFeedbackStats),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "globalFeedbackStats"
)]
#[get("/feedback/stats")]
pub async fn feedback_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<GlobalFeedbackStats>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state
        .feedback_query
        .global_stats(&requester)
        .await
        .map(web::Json)
}

/// Edit the rating or message of one's own feedback.
#[utoipa::path(
    put,
    path = "/api/v1/feedback/{id}",
    params(("id" = String, Path, description = "Feedback id")),
    request_body = FeedbackPatch,
    responses(
        (status = 200, description = "Updated feedback", body = FeedbackWithCourse),
        (status = 400, description = "Invalid rating or message", body = Error),
        (status = 403, description = "Not the author, or blocked", body = Error),
        (status = 404, description = "No such feedback", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "updateFeedback"
)]
#[put("/feedback/{id}")]
pub async fn update_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<FeedbackPatch>,
) -> ApiResult<web::Json<FeedbackWithCourse>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = FeedbackId::parse(&path)?;
    state
        .feedback
        .update(&requester, &id, &payload)
        .await
        .map(web::Json)
}

/// Remove feedback; allowed for its author and for administrators.
#[utoipa::path(
    delete,
    path = "/api/v1/feedback/{id}",
    params(("id" = String, Path, description = "Feedback id")),
    responses(
        (status = 204, description = "Feedback deleted"),
        (status = 403, description = "Not the author, or blocked", body = Error),
        (status = 404, description = "No such feedback", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "deleteFeedback"
)]
#[delete("/feedback/{id}")]
pub async fn delete_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let id = FeedbackId::parse(&path)?;
    state.feedback.delete(&requester, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
