//! Port for feedback persistence.
//!
//! Adapters own the `(student_id, course_id)` uniqueness check: a second
//! insert for the same pair fails atomically with
//! [`FeedbackRepositoryError::Duplicate`].

use std::collections::HashMap;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{CourseId, Feedback, FeedbackFilter, FeedbackId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feedback repository query failed: {message}",
        /// The student already reviewed the course.
        Duplicate { student_id: UserId, course_id: CourseId } =>
            "feedback already exists for student {student_id} on course {course_id}",
        /// The referenced student or course does not exist.
        MissingReference { message: String } => "feedback reference missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new submission.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError>;

    /// Overwrite rating, message and `updated_at` of a submission.
    async fn update(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError>;

    /// Fetch a submission by identifier.
    async fn find_by_id(&self, id: &FeedbackId)
    -> Result<Option<Feedback>, FeedbackRepositoryError>;

    /// Remove a submission. Returns whether a row was deleted.
    async fn delete(&self, id: &FeedbackId) -> Result<bool, FeedbackRepositoryError>;

    /// Remove every submission by a student. Returns the number removed.
    async fn delete_by_student(&self, student_id: &UserId)
    -> Result<u64, FeedbackRepositoryError>;

    /// Number of submissions for a course.
    async fn count_by_course(&self, course_id: &CourseId) -> Result<u64, FeedbackRepositoryError>;

    /// Submission counts for each listed student; students without
    /// submissions may be absent from the map.
    async fn count_by_students(
        &self,
        student_ids: &[UserId],
    ) -> Result<HashMap<UserId, u64>, FeedbackRepositoryError>;

    /// One page of matching submissions, newest first, with the filtered total.
    async fn list_page(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> Result<(Vec<Feedback>, u64), FeedbackRepositoryError>;

    /// Every matching submission, newest first.
    async fn list_matching(
        &self,
        filter: &FeedbackFilter,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError>;

    /// Every submission, for aggregation snapshots.
    async fn list_all(&self) -> Result<Vec<Feedback>, FeedbackRepositoryError>;
}
