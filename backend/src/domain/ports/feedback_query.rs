//! Driving port for feedback listings, statistics and export.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    Error, FeedbackFilter, FeedbackView, FeedbackWithCourse, GlobalFeedbackStats, Requester,
};

/// A rendered export ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackExport {
    /// Suggested download name, e.g. `feedback-export-2024-03-31.csv`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Document body.
    pub bytes: Vec<u8>,
}

/// Feedback reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackQuery: Send + Sync {
    /// Filtered feedback joined with student and course (admin only).
    async fn list_all(
        &self,
        requester: &Requester,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> Result<Paginated<FeedbackView>, Error>;

    /// The requester's own feedback joined with course.
    async fn mine(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Paginated<FeedbackWithCourse>, Error>;

    /// Platform-wide statistics (admin only).
    async fn global_stats(&self, requester: &Requester) -> Result<GlobalFeedbackStats, Error>;

    /// Every matching row rendered for download (admin only).
    async fn export(
        &self,
        requester: &Requester,
        filter: &FeedbackFilter,
    ) -> Result<FeedbackExport, Error>;
}
