//! Driving port for course administration.

use async_trait::async_trait;

use crate::domain::{Course, CourseDraft, CourseId, CoursePatch, Error, Requester};

/// Admin-only course mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCommand: Send + Sync {
    /// Create a course; `conflict` when the name or code is taken.
    async fn create(&self, requester: &Requester, draft: &CourseDraft) -> Result<Course, Error>;

    /// Apply a partial update; `conflict` when the new name or code is taken.
    async fn update(
        &self,
        requester: &Requester,
        id: &CourseId,
        patch: &CoursePatch,
    ) -> Result<Course, Error>;

    /// Hard-delete a course that no feedback references.
    async fn delete(&self, requester: &Requester, id: &CourseId) -> Result<(), Error>;
}
