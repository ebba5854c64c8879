//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Jane Smith","email":"jane@example.com","password":"Student123!"}
//! POST /api/v1/auth/login {"email":"jane@example.com","password":"Student123!"}
//! POST /api/v1/auth/admin-login {"email":"admin@example.com","password":"Admin123!"}
//! GET /api/v1/auth/me
//! POST /api/v1/auth/logout
//! ```
//!
//! Successful registration and login store the account id in the session
//! cookie; every other handler resolves it back into a requester.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::LoginScope;
use crate::domain::{
    Error, FieldErrors, LoginCredentials, LoginValidationError, Registration, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Student123!")]
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        match Self::try_from_parts(&value.email, &value.password) {
            Ok(credentials) => Ok(credentials),
            Err(first) => {
                let mut errors = FieldErrors::new();
                errors.push(&first);
                if first == LoginValidationError::InvalidEmail && value.password.is_empty() {
                    errors.push(&LoginValidationError::EmptyPassword);
                }
                Err(errors.into())
            }
        }
    }
}

async fn sign_in(
    state: &HttpState,
    session: &SessionContext,
    payload: &LoginRequest,
    scope: LoginScope,
) -> ApiResult<UserProfile> {
    let credentials = LoginCredentials::try_from(payload)?;
    let profile = state.login.authenticate(&credentials, scope).await?;
    session.persist(&profile)?;
    Ok(profile)
}

/// Create a student account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = Registration,
    responses(
        (status = 201, description = "Account created", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Registration>,
) -> ApiResult<HttpResponse> {
    let profile = state.accounts.register(&payload).await?;
    session.persist(&profile)?;
    Ok(HttpResponse::Created().json(profile))
}

/// Authenticate any account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account blocked", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    sign_in(&state, &session, &payload, LoginScope::Any)
        .await
        .map(web::Json)
}

/// Authenticate an administrator; student accounts are rejected as unknown.
#[utoipa::path(
    post,
    path = "/api/v1/auth/admin-login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserProfile,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/auth/admin-login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    sign_in(&state, &session, &payload, LoginScope::AdminOnly)
        .await
        .map(web::Json)
}

/// The signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserProfile),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let profile = state.profile.fetch_profile(&requester).await?;
    Ok(web::Json(profile))
}

/// End the session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
