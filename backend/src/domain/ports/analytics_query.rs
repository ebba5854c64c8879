//! Driving port for the admin dashboard and analytics views.

use async_trait::async_trait;

use crate::domain::{AnalyticsReport, DashboardSummary, Error, Requester};

/// Admin-only aggregate reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Headline counters and the best-rated courses.
    async fn dashboard(&self, requester: &Requester) -> Result<DashboardSummary, Error>;

    /// Trends over the trailing `period_days` (defaulted and capped by the
    /// implementation).
    async fn analytics(
        &self,
        requester: &Requester,
        period_days: Option<u32>,
    ) -> Result<AnalyticsReport, Error>;
}
