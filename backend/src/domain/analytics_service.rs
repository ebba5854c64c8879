//! Admin dashboard and trend reports over a repository snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::analytics::DEFAULT_ANALYTICS_DAYS;
use super::service_support::{Repositories, require_admin};
use crate::domain::ports::AnalyticsQuery;
use crate::domain::{AnalyticsReport, DashboardSummary, Error, Requester};

/// Longest analytics window served when none is configured.
pub const DEFAULT_MAX_ANALYTICS_DAYS: u32 = 365;

/// Service implementing [`AnalyticsQuery`].
#[derive(Clone)]
pub struct AnalyticsService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
    max_days: u32,
}

impl AnalyticsService {
    /// Create a service with the default window cap.
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            clock,
            max_days: DEFAULT_MAX_ANALYTICS_DAYS,
        }
    }

    /// Cap analytics windows at `max_days` (at least one day).
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days.max(1);
        self
    }

    /// Resolve the requested window: absent or zero means the default,
    /// anything longer than the cap is clamped.
    pub fn effective_period(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_ANALYTICS_DAYS)
            .min(self.max_days)
    }
}

#[async_trait]
impl AnalyticsQuery for AnalyticsService {
    async fn dashboard(&self, requester: &Requester) -> Result<DashboardSummary, Error> {
        require_admin(requester)?;
        let snapshot = self.repos.snapshot().await?;
        Ok(snapshot.dashboard_summary(self.clock.utc()))
    }

    async fn analytics(
        &self,
        requester: &Requester,
        period_days: Option<u32>,
    ) -> Result<AnalyticsReport, Error> {
        require_admin(requester)?;
        let period = self.effective_period(period_days);
        debug!(requested = ?period_days, period, "building analytics report");
        let snapshot = self.repos.snapshot().await?;
        Ok(snapshot.analytics(self.clock.utc(), period))
    }
}
