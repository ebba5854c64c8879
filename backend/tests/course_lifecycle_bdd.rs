//! Behaviour tests for the course and feedback lifecycle.
//!
//! Steps call the driving ports directly on the in-process stack, so the
//! scenario covers service rules without an HTTP round trip.

use std::future::Future;
use std::sync::Mutex;

use course_feedback::domain::ports::{AccountCommand, CourseCommand, CourseQuery, FeedbackCommand};
use course_feedback::domain::{
    CourseDraft, CourseId, Error, ErrorCode, FeedbackDraft, FeedbackId, Registration, Requester,
    Role,
};
use course_feedback::test_support::InMemoryStack;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct LifecycleWorld {
    runtime: Runtime,
    stack: InMemoryStack,
    admin: Option<Requester>,
    student: Option<Requester>,
    course: Option<CourseId>,
    feedback: Option<FeedbackId>,
    last_error: Option<Error>,
}

impl LifecycleWorld {
    fn new() -> Self {
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime"),
            stack: InMemoryStack::new().expect("in-memory stack"),
            admin: None,
            student: None,
            course: None,
            feedback: None,
            last_error: None,
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn admin(&self) -> Requester {
        self.admin.expect("admin signed in")
    }

    fn student(&self) -> Requester {
        self.student.expect("student registered")
    }

    fn course(&self) -> CourseId {
        self.course.expect("course created")
    }
}

#[fixture]
fn world() -> Mutex<LifecycleWorld> {
    Mutex::new(LifecycleWorld::new())
}

#[given("an administrator with a published course")]
fn an_administrator_with_a_published_course(world: &Mutex<LifecycleWorld>) {
    let mut world = world.lock().expect("world lock");
    let admin = world
        .block_on(
            world
                .stack
                .insert_admin("Course Admin", "admin@example.edu", "Admin@1234"),
        )
        .expect("admin inserted");
    let requester = admin.requester();
    let draft = CourseDraft {
        name: "Operating Systems".to_owned(),
        code: "CS350".to_owned(),
        credits: Some(4),
        ..CourseDraft::default()
    };
    let course = world
        .block_on(world.stack.state.courses.create(&requester, &draft))
        .expect("course created");
    world.admin = Some(requester);
    world.course = Some(course.id);
}

#[given("a registered student")]
fn a_registered_student(world: &Mutex<LifecycleWorld>) {
    let mut world = world.lock().expect("world lock");
    let registration = Registration {
        name: "Jane Smith".to_owned(),
        email: "jane@example.com".to_owned(),
        password: "Student123!".to_owned(),
    };
    let profile = world
        .block_on(world.stack.state.accounts.register(&registration))
        .expect("student registered");
    assert_eq!(profile.role, Role::Student);
    world.student = Some(Requester::new(profile.id, profile.role));
}

#[when("the student rates the course four stars")]
fn the_student_rates_the_course_four_stars(world: &Mutex<LifecycleWorld>) {
    let mut world = world.lock().expect("world lock");
    let draft = FeedbackDraft {
        course_id: world.course(),
        rating: 4,
        message: "Dense but rewarding material.".to_owned(),
    };
    let student = world.student();
    let view = world
        .block_on(world.stack.state.feedback.create(&student, &draft))
        .expect("feedback submitted");
    world.feedback = Some(view.id);
}

#[then("the course statistics show one rating averaging four")]
fn the_course_statistics_show_one_rating_averaging_four(world: &Mutex<LifecycleWorld>) {
    let world = world.lock().expect("world lock");
    let admin = world.admin();
    let courses = world
        .block_on(world.stack.state.courses_query.with_stats(&admin))
        .expect("stats listed");
    let course = courses
        .iter()
        .find(|entry| entry.course.id == world.course())
        .expect("course in stats");
    assert_eq!(course.feedback_count, 1);
    assert!((course.avg_rating - 4.0).abs() < f64::EPSILON);
}

#[when("the administrator deletes the course")]
fn the_administrator_deletes_the_course(world: &Mutex<LifecycleWorld>) {
    let mut world = world.lock().expect("world lock");
    let admin = world.admin();
    let course = world.course();
    world.last_error = world
        .block_on(world.stack.state.courses.delete(&admin, &course))
        .err();
}

#[then("the deletion is refused as a conflict")]
fn the_deletion_is_refused_as_a_conflict(world: &Mutex<LifecycleWorld>) {
    let world = world.lock().expect("world lock");
    let error = world.last_error.as_ref().expect("deletion refused");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[when("the student withdraws their feedback")]
fn the_student_withdraws_their_feedback(world: &Mutex<LifecycleWorld>) {
    let world = world.lock().expect("world lock");
    let student = world.student();
    let feedback = world.feedback.expect("feedback submitted");
    world
        .block_on(world.stack.state.feedback.delete(&student, &feedback))
        .expect("feedback withdrawn");
}

#[then("the course is gone")]
fn the_course_is_gone(world: &Mutex<LifecycleWorld>) {
    let world = world.lock().expect("world lock");
    assert!(world.last_error.is_none(), "{:?}", world.last_error);
    let admin = world.admin();
    let course = world.course();
    let error = world
        .block_on(world.stack.state.courses_query.get(&admin, &course))
        .expect_err("course deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[scenario(path = "tests/features/course_lifecycle.feature")]
fn course_lifecycle(world: Mutex<LifecycleWorld>) {
    drop(world);
}
