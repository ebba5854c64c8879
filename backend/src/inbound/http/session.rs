//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie only carries the account id. Every authenticated request
//! resolves it back into a [`Requester`] through [`UserProfileQuery`], so a
//! role change, block or deletion takes effect on the next request.

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::UserProfileQuery;
use crate::domain::{Error, ErrorCode, Requester, UserId, UserProfile};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Idle lifetime of a session cookie.
pub const SESSION_TTL_HOURS: i64 = 2;

/// Cookie-backed session middleware.
///
/// The cookie is encrypted and HTTP-only, and expires after
/// [`SESSION_TTL_HOURS`] hours.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start an authenticated session for `profile`.
    ///
    /// The session id is renewed so a cookie planted before login cannot be
    /// reused afterwards.
    pub fn persist(&self, profile: &UserProfile) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, profile.id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match raw.parse::<UserId>() {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("Not authenticated"))
    }

    /// Resolve the signed-in account into a [`Requester`].
    ///
    /// A session pointing at a deleted account is purged before the
    /// `401 Unauthorized` is returned. Other failures, such as an unavailable
    /// store, leave the session intact.
    pub async fn requester(&self, profiles: &dyn UserProfileQuery) -> Result<Requester, Error> {
        let user_id = self.require_user_id()?;
        let resolved = profiles.resolve_requester(&user_id).await;
        if matches!(&resolved, Err(error) if error.code() == ErrorCode::Unauthorized) {
            self.clear();
        }
        resolved
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserProfileQuery;
    use crate::domain::Role;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn fixture_profile() -> UserProfile {
        UserProfile {
            id: FIXTURE_ID.parse().expect("fixture id"),
            name: "Jane Smith".to_owned(),
            email: "jane@example.com".to_owned(),
            role: Role::Student,
            phone: None,
            date_of_birth: None,
            address: None,
            profile_picture_url: None,
            is_blocked: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("date"),
        }
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    session.persist(&fixture_profile())?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            )
            .route(
                "/logout",
                web::get().to(|session: SessionContext| async move {
                    session.clear();
                    HttpResponse::NoContent()
                }),
            )
    }

    #[rstest]
    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, FIXTURE_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn clear_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let logout = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = logout
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");
        assert_eq!(removal.value(), "");
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = test::init_service(
            session_test_app().route(
                "/set-invalid",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    async fn whoami(
        session: SessionContext,
        profiles: web::Data<MockUserProfileQuery>,
    ) -> Result<HttpResponse, Error> {
        let requester = session.requester(profiles.get_ref()).await?;
        Ok(HttpResponse::Ok().body(requester.id().to_string()))
    }

    #[rstest]
    #[case::deleted_account(
        Error::unauthorized("Account no longer exists"),
        StatusCode::UNAUTHORIZED,
        true
    )]
    #[case::store_outage(
        Error::service_unavailable("user store unavailable"),
        StatusCode::SERVICE_UNAVAILABLE,
        false
    )]
    #[actix_web::test]
    async fn requester_failure_only_purges_unresolvable_accounts(
        #[case] failure: Error,
        #[case] status: StatusCode,
        #[case] purged: bool,
    ) {
        let expected = failure.clone();
        let mut profiles = MockUserProfileQuery::new();
        profiles
            .expect_resolve_requester()
            .times(1)
            .return_once(move |_| Err(failure));

        let app = test::init_service(
            session_test_app().app_data(web::Data::new(profiles)).route(
                "/whoami",
                web::get().to(whoami),
            ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), status);
        let removal = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.value().to_owned());
        assert_eq!(removal.as_deref() == Some(""), purged);
        let payload: Error = test::read_body_json(res).await;
        assert_eq!(payload.code(), expected.code());
        assert_eq!(payload.message(), expected.message());
    }
}
