//! Self-service profile handlers.
//!
//! ```text
//! GET /api/v1/users/profile
//! PUT /api/v1/users/profile {"phone":"5551234567"}
//! PUT /api/v1/users/change-password {"currentPassword":"...","newPassword":"..."}
//! POST /api/v1/users/avatar   (raw image body, Content-Type: image/png)
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{AvatarUpload, Error, PasswordChange, ProfilePatch, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response for a stored avatar.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    #[schema(example = "/uploads/avatars/5f1d...c2.png")]
    pub profile_picture_url: String,
}

/// Fetch the signed-in account's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state.profile.fetch_profile(&requester).await.map(web::Json)
}

/// Change name, phone, date of birth or address.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Account blocked", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfilePatch>,
) -> ApiResult<web::Json<UserProfile>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state
        .accounts
        .update_profile(&requester, &payload)
        .await
        .map(web::Json)
}

/// Replace the password after checking the current one.
#[utoipa::path(
    put,
    path = "/api/v1/users/change-password",
    request_body = PasswordChange,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request or wrong current password", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Account blocked", body = Error)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/users/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordChange>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    state.accounts.change_password(&requester, &payload).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Read at most `ceiling` bytes; anything longer is cut at `ceiling`.
///
/// Reading one byte past the configured limit lets the service tell an
/// oversize upload apart from one that is exactly at the limit.
async fn read_capped(mut payload: web::Payload, ceiling: usize) -> ApiResult<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(next) = payload.next().await {
        let chunk = next.map_err(|err| {
            debug!(error = %err, "avatar upload aborted");
            Error::invalid_request("Upload could not be read")
        })?;
        let room = ceiling.saturating_sub(body.len());
        body.extend_from_slice(chunk.get(..room.min(chunk.len())).unwrap_or_default());
        if body.len() >= ceiling {
            break;
        }
    }
    Ok(body)
}

/// Upload a new profile picture as the raw request body.
#[utoipa::path(
    post,
    path = "/api/v1/users/avatar",
    request_body(
        content = Vec<u8>,
        content_type = "image/png",
        description = "JPEG, PNG, GIF or WebP image bytes"
    ),
    responses(
        (status = 200, description = "Stored avatar", body = AvatarResponse),
        (status = 400, description = "Missing, oversize or non-image upload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Account blocked", body = Error)
    ),
    tags = ["users"],
    operation_id = "uploadAvatar"
)]
#[post("/users/avatar")]
pub async fn upload_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<AvatarResponse>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let ceiling = state.limits.max_avatar_bytes.saturating_add(1);
    let bytes = read_capped(payload, ceiling).await?;
    let profile_picture_url = state
        .accounts
        .upload_avatar(
            &requester,
            AvatarUpload {
                content_type,
                bytes,
            },
        )
        .await?;
    Ok(web::Json(AvatarResponse {
        profile_picture_url,
    }))
}
