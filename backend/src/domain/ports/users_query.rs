//! Driving port for the admin user directory.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, FeedbackWithCourse, Requester, StudentFeedbackStats, UserId, UserProfile,
};

use super::StudentFilter;

/// A student row annotated with its submission count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub feedback_count: u64,
}

/// Everything an administrator sees about one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user: UserProfile,
    pub feedback: Vec<FeedbackWithCourse>,
    pub stats: StudentFeedbackStats,
}

/// Admin-only user reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Students matching `filter`, newest first.
    async fn list_students(
        &self,
        requester: &Requester,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<Paginated<StudentSummary>, Error>;

    /// One account with its feedback history and statistics.
    async fn user_details(&self, requester: &Requester, id: &UserId)
    -> Result<UserDetails, Error>;
}
