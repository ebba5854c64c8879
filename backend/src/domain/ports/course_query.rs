//! Driving port for course reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Course, CourseDetails, CourseId, CourseWithStats, Error, Requester};

/// Course listings and lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Courses sorted by name. Students only see active courses.
    async fn list(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Paginated<Course>, Error>;

    /// A single course; administrators also receive its statistics.
    async fn get(&self, requester: &Requester, id: &CourseId) -> Result<CourseDetails, Error>;

    /// Every course with lifetime feedback numbers (admin only).
    async fn with_stats(&self, requester: &Requester) -> Result<Vec<CourseWithStats>, Error>;
}
