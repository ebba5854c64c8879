//! Driving port for feedback submission.

use async_trait::async_trait;

use crate::domain::{
    Error, FeedbackDraft, FeedbackId, FeedbackPatch, FeedbackView, FeedbackWithCourse, Requester,
};

/// Feedback mutations guarded by ownership, block status and uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackCommand: Send + Sync {
    /// Submit the requester's feedback for a course.
    async fn create(
        &self,
        requester: &Requester,
        draft: &FeedbackDraft,
    ) -> Result<FeedbackView, Error>;

    /// Edit the requester's own submission.
    async fn update(
        &self,
        requester: &Requester,
        id: &FeedbackId,
        patch: &FeedbackPatch,
    ) -> Result<FeedbackWithCourse, Error>;

    /// Delete a submission as its author or as an administrator.
    async fn delete(&self, requester: &Requester, id: &FeedbackId) -> Result<(), Error>;
}
