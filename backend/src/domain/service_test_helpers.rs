//! Builders and doubles shared by the domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::ports::{MockCourseRepository, MockFeedbackRepository, MockUserRepository};
use super::service_support::Repositories;
use super::{
    Course, CourseCode, CourseId, CourseName, Email, Feedback, FeedbackId, FeedbackMessage,
    PasswordHash, Rating, Requester, Role, User, UserName,
};

/// Clock pinned to a single instant.
pub(crate) struct FixtureClock {
    pub(crate) utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Noon on 31 March 2024, the instant every service test runs at.
pub(crate) fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: test_now(),
    })
}

pub(crate) fn repositories(
    users: MockUserRepository,
    courses: MockCourseRepository,
    feedback: MockFeedbackRepository,
) -> Repositories {
    Repositories::new(Arc::new(users), Arc::new(courses), Arc::new(feedback))
}

pub(crate) fn user(name: &str, email: &str, role: Role) -> User {
    User::new(
        UserName::new(name).expect("name"),
        Email::new(email).expect("email"),
        PasswordHash::new("$argon2id$stored"),
        role,
        test_now(),
    )
}

pub(crate) fn student() -> User {
    user("Jane Smith", "jane@example.com", Role::Student)
}

pub(crate) fn admin() -> User {
    user("Admin", "admin@example.com", Role::Admin)
}

pub(crate) fn admin_requester() -> Requester {
    admin().requester()
}

pub(crate) fn course(name: &str, code: &str) -> Course {
    Course {
        id: CourseId::random(),
        name: CourseName::new(name).expect("course name"),
        code: CourseCode::new(code).expect("course code"),
        description: None,
        instructor: Some("Dr. Byte".to_owned()),
        credits: None,
        is_active: true,
        created_at: test_now(),
    }
}

pub(crate) fn feedback(student: &User, course: &Course, rating: i64) -> Feedback {
    Feedback {
        id: FeedbackId::random(),
        student_id: student.id,
        course_id: course.id,
        rating: Rating::new(rating).expect("rating"),
        message: FeedbackMessage::new("Clear lectures and fair assignments.").expect("message"),
        created_at: test_now(),
        updated_at: test_now(),
    }
}
