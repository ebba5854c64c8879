//! End-to-end flows through the HTTP surface over the in-process store.
//!
//! Each test builds the real services with [`InMemoryStack`] and drives them
//! with `actix_web::test`, so routing, sessions, extractors and domain rules
//! are exercised together.

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use course_feedback::Trace;
use course_feedback::inbound::http::configure;
use course_feedback::inbound::http::session::{SESSION_COOKIE, session_middleware};
use course_feedback::test_support::InMemoryStack;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const ADMIN_EMAIL: &str = "admin@example.edu";
const ADMIN_PASSWORD: &str = "Admin@1234";
const STUDENT_PASSWORD: &str = "Student123!";

macro_rules! init_app {
    ($stack:expr) => {
        test::init_service(
            App::new()
                .app_data($stack.state.clone())
                .wrap(session_middleware(Key::generate(), false, SameSite::Lax))
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

#[fixture]
fn stack() -> InMemoryStack {
    InMemoryStack::new().expect("in-memory stack")
}

fn session_of<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

fn post_json(path: &str, body: &Value) -> test::TestRequest {
    test::TestRequest::post().uri(path).set_json(body)
}

fn register_body(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "password": STUDENT_PASSWORD })
}

fn admin_login_body() -> Value {
    json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })
}

fn course_body(name: &str, code: &str) -> Value {
    json!({ "name": name, "code": code, "instructor": "Dr. Ada", "credits": 4 })
}

#[rstest]
#[actix_web::test]
async fn student_feedback_reaches_admin_statistics_and_export(stack: InMemoryStack) {
    stack
        .insert_admin("Course Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("admin inserted");
    let app = init_app!(stack);

    let res = test::call_service(
        &app,
        post_json("/api/v1/auth/admin-login", &admin_login_body()).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let admin = session_of(&res);

    let res = test::call_service(
        &app,
        post_json("/api/v1/courses", &course_body("Data Structures", "cs201"))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let course: Value = test::read_body_json(res).await;
    assert_eq!(course["code"], "CS201");
    let course_id = course["id"].as_str().expect("course id").to_owned();

    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/register",
            &register_body("Jane Smith", "jane@example.com"),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let student = session_of(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/courses")
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = test::read_body_json(res).await;
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["pagination"]["totalItems"], 1);

    let feedback = json!({
        "courseId": course_id,
        "rating": 4,
        "message": "Clear lectures overall."
    });
    let res = test::call_service(
        &app,
        post_json("/api/v1/feedback", &feedback)
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        post_json("/api/v1/feedback", &feedback)
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/feedback/mine")
            .cookie(student)
            .to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(res).await;
    assert_eq!(mine["items"].as_array().map(Vec::len), Some(1));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/feedback/stats")
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let stats: Value = test::read_body_json(res).await;
    assert_eq!(stats["totalFeedback"], 1);
    assert_eq!(stats["avgRating"], 4.0);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/feedback/export")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/csv"), "got {content_type}");
    let body = test::read_body(res).await;
    let csv = std::str::from_utf8(&body).expect("utf-8 csv");
    assert!(csv.starts_with("Student Name,Student Email,Course Name"));
    assert!(csv.contains("CS201"));
}

#[rstest]
#[actix_web::test]
async fn students_are_kept_out_of_admin_routes(stack: InMemoryStack) {
    let app = init_app!(stack);
    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/register",
            &register_body("Sam Lee", "sam@example.com"),
        )
        .to_request(),
    )
    .await;
    let student = session_of(&res);

    for uri in ["/api/v1/admin/dashboard", "/api/v1/feedback/all", "/api/v1/courses/stats"] {
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(uri)
                .cookie(student.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[rstest]
#[actix_web::test]
async fn student_login_is_refused_on_the_admin_entry_point(stack: InMemoryStack) {
    let app = init_app!(stack);
    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/register",
            &register_body("Sam Lee", "sam@example.com"),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/admin-login",
            &json!({ "email": "sam@example.com", "password": STUDENT_PASSWORD }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn blocked_students_can_read_but_not_submit(stack: InMemoryStack) {
    stack
        .insert_admin("Course Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("admin inserted");
    let app = init_app!(stack);

    let res = test::call_service(
        &app,
        post_json("/api/v1/auth/admin-login", &admin_login_body()).to_request(),
    )
    .await;
    let admin = session_of(&res);
    let res = test::call_service(
        &app,
        post_json("/api/v1/courses", &course_body("Algorithms", "CS301"))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    let course: Value = test::read_body_json(res).await;

    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/register",
            &register_body("Jane Smith", "jane@example.com"),
        )
        .to_request(),
    )
    .await;
    let student = session_of(&res);
    let profile: Value = test::read_body_json(res).await;
    let student_id = profile["id"].as_str().expect("student id");

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{student_id}/toggle-block"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let toggled: Value = test::read_body_json(res).await;
    assert_eq!(toggled["isBlocked"], true);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/courses")
            .cookie(student.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/feedback",
            &json!({ "courseId": course["id"], "rating": 5, "message": "Great pacing all term." }),
        )
        .cookie(student)
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn validation_failures_name_the_offending_fields(stack: InMemoryStack) {
    let app = init_app!(stack);
    let res = test::call_service(
        &app,
        post_json(
            "/api/v1/auth/register",
            &json!({ "name": "J", "email": "not-an-email", "password": "weak" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    let fields = body["details"]["fields"].as_object().expect("field map");
    for field in ["name", "email", "password"] {
        assert!(fields.contains_key(field), "missing {field}");
    }
}

#[rstest]
#[case::admin(true)]
#[case::student(false)]
#[actix_web::test]
async fn created_course_reads_back_unchanged(stack: InMemoryStack, #[case] as_admin: bool) {
    stack
        .insert_admin("Course Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("admin inserted");
    let app = init_app!(stack);

    let res = test::call_service(
        &app,
        post_json("/api/v1/auth/admin-login", &admin_login_body()).to_request(),
    )
    .await;
    let admin = session_of(&res);

    let draft = json!({
        "name": "Operating Systems",
        "code": "CS310",
        "description": "Processes, memory and file systems.",
        "instructor": "Prof. Grace Hopper",
        "credits": 3
    });
    let res = test::call_service(
        &app,
        post_json("/api/v1/courses", &draft)
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let course_id = created["id"].as_str().expect("course id").to_owned();

    let reader = if as_admin {
        admin
    } else {
        let res = test::call_service(
            &app,
            post_json(
                "/api/v1/auth/register",
                &register_body("Reader Student", "reader@example.com"),
            )
            .to_request(),
        )
        .await;
        session_of(&res)
    };

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{course_id}"))
            .cookie(reader)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let details: Value = test::read_body_json(res).await;
    let fetched = &details["course"];
    for field in ["name", "code", "description", "instructor", "credits"] {
        assert_eq!(fetched[field], draft[field], "field {field}");
    }
    assert_eq!(fetched, &created);
    assert_eq!(fetched["isActive"], true);
    assert_eq!(details.get("stats").is_some(), as_admin);
}
