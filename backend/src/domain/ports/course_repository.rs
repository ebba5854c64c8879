//! Port for course persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Course, CourseCode, CourseId, CourseName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "course repository query failed: {message}",
        /// Another course already uses the name.
        DuplicateName { name: String } => "course name already exists: {name}",
        /// Another course already uses the code.
        DuplicateCode { code: String } => "course code already exists: {code}",
        /// Feedback still references the course.
        Referenced { feedback_count: u64 } =>
            "course is referenced by {feedback_count} feedback submissions",
    }
}

/// Which courses a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseVisibility {
    /// Only active courses.
    ActiveOnly,
    /// Active and inactive courses.
    All,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course, enforcing unique name and code.
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Overwrite an existing course, enforcing unique name and code.
    async fn update(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Fetch a course by identifier.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// Fetch every course whose id is listed; unknown ids are ignored.
    async fn find_by_ids(&self, ids: &[CourseId]) -> Result<Vec<Course>, CourseRepositoryError>;

    /// A course other than `excluding` that owns `name` or `code`, if any.
    async fn find_conflicting(
        &self,
        name: &CourseName,
        code: &CourseCode,
        excluding: Option<CourseId>,
    ) -> Result<Option<Course>, CourseRepositoryError>;

    /// One page of courses sorted by name, with the total.
    async fn list(
        &self,
        visibility: CourseVisibility,
        page: PageRequest,
    ) -> Result<(Vec<Course>, u64), CourseRepositoryError>;

    /// Every course, for aggregation snapshots.
    async fn list_all(&self) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Hard-delete a course. Fails with `Referenced` while feedback points
    /// at it. Returns whether a row was deleted.
    async fn delete(&self, id: &CourseId) -> Result<bool, CourseRepositoryError>;
}
