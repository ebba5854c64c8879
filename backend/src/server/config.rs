//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use course_feedback::domain::{CodeEditPolicy, DEFAULT_MAX_ANALYTICS_DAYS, Repositories};
use course_feedback::inbound::http::state::HttpLimits;
use course_feedback::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use super::state_builders::{diesel_repositories, in_memory_repositories};

/// Where uploaded avatars are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    pub(crate) dir: PathBuf,
    pub(crate) base_url: String,
}

impl AvatarStorage {
    /// Store avatars under `dir`, published below `base_url`.
    pub fn new(dir: PathBuf, base_url: impl Into<String>) -> Self {
        Self {
            dir,
            base_url: base_url.into(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repositories: Repositories,
    pub(crate) limits: HttpLimits,
    pub(crate) code_policy: CodeEditPolicy,
    pub(crate) max_analytics_days: u32,
    pub(crate) avatars: AvatarStorage,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-process store.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        avatars: AvatarStorage,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            repositories: in_memory_repositories(),
            limits: HttpLimits::default(),
            code_policy: CodeEditPolicy::default(),
            max_analytics_days: DEFAULT_MAX_ANALYTICS_DAYS,
            avatars,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Persist through PostgreSQL instead of the in-process store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.repositories = diesel_repositories(&pool);
        self
    }

    /// Override page bounds and the avatar size cap.
    #[must_use]
    pub fn with_limits(mut self, limits: HttpLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Choose whether course codes may change after creation.
    #[must_use]
    pub fn with_code_policy(mut self, code_policy: CodeEditPolicy) -> Self {
        self.code_policy = code_policy;
        self
    }

    /// Cap the analytics window.
    #[must_use]
    pub fn with_max_analytics_days(mut self, days: u32) -> Self {
        self.max_analytics_days = days;
        self
    }

    /// Repositories the services will use; startup seeding writes here too.
    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
