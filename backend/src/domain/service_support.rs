//! Shared plumbing for the domain services: port error mapping, requester
//! guards and snapshot loading.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::ports::{
    BlobStoreError, CourseRepository, CourseRepositoryError, FeedbackExportError,
    FeedbackRepository, FeedbackRepositoryError, PasswordHasherError, UserPersistenceError,
    UserRepository,
};
use super::{Course, CourseId, Error, Feedback, FeedbackSnapshot, Requester, User};

/// Driven ports shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Repositories {
    /// Bundle the three repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        courses: Arc<dyn CourseRepository>,
        feedback: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self {
            users,
            courses,
            feedback,
        }
    }

    /// Read users, courses and feedback for the aggregation engine.
    pub(crate) async fn snapshot(&self) -> Result<FeedbackSnapshot, Error> {
        let users = self.users.list_all().await.map_err(map_user_error)?;
        let courses = self.courses.list_all().await.map_err(map_course_error)?;
        let feedback = self.feedback.list_all().await.map_err(map_feedback_error)?;
        Ok(FeedbackSnapshot::new(users, courses, feedback))
    }

    /// Courses referenced by `feedback`, keyed by id, in one batched lookup.
    pub(crate) async fn courses_for(
        &self,
        feedback: &[Feedback],
    ) -> Result<HashMap<CourseId, Course>, Error> {
        let ids: Vec<CourseId> = feedback
            .iter()
            .map(|row| row.course_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let courses = self
            .courses
            .find_by_ids(&ids)
            .await
            .map_err(map_course_error)?;
        Ok(courses.into_iter().map(|course| (course.id, course)).collect())
    }

    /// Reload the requester's account; a vanished account is unauthorised.
    pub(crate) async fn requester_account(&self, requester: &Requester) -> Result<User, Error> {
        self.users
            .find_by_id(&requester.id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Account no longer exists"))
    }

    /// Like [`Repositories::requester_account`] but also rejects blocked
    /// accounts.
    pub(crate) async fn active_requester(&self, requester: &Requester) -> Result<User, Error> {
        let user = self.requester_account(requester).await?;
        if user.is_blocked {
            debug!(user_id = %user.id, "blocked account attempted a mutation");
            return Err(Error::forbidden("Your account has been blocked"));
        }
        Ok(user)
    }
}

/// Reject non-administrators.
pub(crate) fn require_admin(requester: &Requester) -> Result<(), Error> {
    if requester.is_admin() {
        Ok(())
    } else {
        debug!(user_id = %requester.id(), "admin-only operation refused");
        Err(Error::forbidden("Admin access required"))
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("User already exists")
            .with_details(json!({ "fields": { "email": "Email is already registered" } })),
    }
}

pub(crate) fn map_course_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        CourseRepositoryError::Query { message } => {
            Error::internal(format!("course repository error: {message}"))
        }
        CourseRepositoryError::DuplicateName { .. } => {
            Error::conflict("Course with this name or code already exists")
                .with_details(json!({ "fields": { "name": "Course name already exists" } }))
        }
        CourseRepositoryError::DuplicateCode { .. } => {
            Error::conflict("Course with this name or code already exists")
                .with_details(json!({ "fields": { "code": "Course code already exists" } }))
        }
        CourseRepositoryError::Referenced { feedback_count } => referenced_course(feedback_count),
    }
}

/// Conflict raised when deleting a course that still has feedback.
pub(crate) fn referenced_course(feedback_count: u64) -> Error {
    Error::conflict(format!(
        "Cannot delete course. It has {feedback_count} feedback submissions. \
         Consider deactivating instead."
    ))
    .with_details(json!({ "feedbackCount": feedback_count }))
}

pub(crate) fn map_feedback_error(error: FeedbackRepositoryError) -> Error {
    match error {
        FeedbackRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feedback repository unavailable: {message}"))
        }
        FeedbackRepositoryError::Query { message } => {
            Error::internal(format!("feedback repository error: {message}"))
        }
        FeedbackRepositoryError::Duplicate { .. } => {
            Error::conflict("You have already submitted feedback for this course")
        }
        FeedbackRepositoryError::MissingReference { .. } => Error::not_found("Course not found"),
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_blob_error(error: BlobStoreError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_export_error(error: FeedbackExportError) -> Error {
    Error::internal(error.to_string())
}
