//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockAnalyticsQuery, MockCourseCommand, MockCourseQuery,
    MockFeedbackCommand, MockFeedbackQuery, MockLoginService, MockUserAdminCommand,
    MockUserProfileQuery, MockUsersQuery,
};
use crate::domain::{Requester, Role, UserId, UserProfile};
use crate::inbound::http::session::{SESSION_COOKIE, USER_ID_KEY, session_middleware};
use crate::inbound::http::state::{HttpLimits, HttpState, HttpStatePorts};

/// Session middleware with a fresh key and the `Secure` flag off, so
/// cookies round-trip over plain HTTP in tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false, SameSite::Lax)
}

/// The `session` cookie set by `response`, if any.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

pub const STUDENT_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const ADMIN_ID: &str = "9b2e4c1a-7d3f-4e8b-a6c5-0f1e2d3c4b5a";

pub fn profile(id: &str, name: &str, email: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.parse().expect("fixture id"),
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        phone: None,
        date_of_birth: None,
        address: None,
        profile_picture_url: None,
        is_blocked: false,
        created_at: Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .expect("fixture date"),
    }
}

pub fn student_profile() -> UserProfile {
    profile(STUDENT_ID, "Jane Smith", "jane@example.com", Role::Student)
}

pub fn admin_profile() -> UserProfile {
    profile(ADMIN_ID, "Admin", "admin@example.com", Role::Admin)
}

/// Mock ports with nothing expected; tests set the expectations they need.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub profile: MockUserProfileQuery,
    pub accounts: MockAccountCommand,
    pub courses: MockCourseCommand,
    pub courses_query: MockCourseQuery,
    pub feedback: MockFeedbackCommand,
    pub feedback_query: MockFeedbackQuery,
    pub users: MockUsersQuery,
    pub user_admin: MockUserAdminCommand,
    pub analytics: MockAnalyticsQuery,
}

impl MockPorts {
    /// Resolve every session to `requester`.
    pub fn signed_in_as(mut self, requester: Requester) -> Self {
        self.profile
            .expect_resolve_requester()
            .returning(move |_| Ok(requester));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                profile: Arc::new(self.profile),
                accounts: Arc::new(self.accounts),
                courses: Arc::new(self.courses),
                courses_query: Arc::new(self.courses_query),
                feedback: Arc::new(self.feedback),
                feedback_query: Arc::new(self.feedback_query),
                users: Arc::new(self.users),
                user_admin: Arc::new(self.user_admin),
                analytics: Arc::new(self.analytics),
            },
            HttpLimits::default(),
        )
    }
}

pub fn student_requester() -> Requester {
    Requester::new(STUDENT_ID.parse::<UserId>().expect("id"), Role::Student)
}

pub fn admin_requester() -> Requester {
    Requester::new(ADMIN_ID.parse::<UserId>().expect("id"), Role::Admin)
}

/// Route that signs an arbitrary account id in, standing in for login.
async fn sign_in_route(session: Session, id: web::Path<String>) -> HttpResponse {
    session
        .insert(USER_ID_KEY, id.into_inner())
        .expect("session insert");
    HttpResponse::Ok().finish()
}

/// The full API over `state`, plus `GET /test/sign-in/{id}`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .configure(crate::inbound::http::configure)
        .route("/test/sign-in/{id}", web::get().to(sign_in_route))
}

/// Sign an account id in through [`test_app`] and return its cookie.
macro_rules! sign_in {
    ($app:expr, $id:expr) => {{
        let response = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::get()
                .uri(&format!("/test/sign-in/{}", $id))
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&response).expect("session cookie")
    }};
}
pub(crate) use sign_in;
