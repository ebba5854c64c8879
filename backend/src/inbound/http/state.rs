//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::{PageLimits, PageRequest};

use crate::domain::DEFAULT_MAX_AVATAR_BYTES;
use crate::domain::ports::{
    AccountCommand, AnalyticsQuery, CourseCommand, CourseQuery, FeedbackCommand, FeedbackQuery,
    LoginService, UserAdminCommand, UserProfileQuery, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub courses: Arc<dyn CourseCommand>,
    pub courses_query: Arc<dyn CourseQuery>,
    pub feedback: Arc<dyn FeedbackCommand>,
    pub feedback_query: Arc<dyn FeedbackQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub user_admin: Arc<dyn UserAdminCommand>,
    pub analytics: Arc<dyn AnalyticsQuery>,
}

/// Request-shaping limits applied before calling a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    /// Page size bounds for feedback and user listings.
    pub listing: PageLimits,
    /// Page size bounds for the course catalogue.
    pub courses: PageLimits,
    /// Largest avatar body read from the wire.
    pub max_avatar_bytes: usize,
}

impl HttpLimits {
    /// Listings default to 10 rows, the catalogue to 20; both cap at 100.
    pub const DEFAULT: Self = Self {
        listing: match PageLimits::new(10, 100) {
            Ok(limits) => limits,
            Err(_) => panic!("static listing limits are valid"),
        },
        courses: match PageLimits::new(20, 100) {
            Ok(limits) => limits,
            Err(_) => panic!("static course limits are valid"),
        },
        max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
    };
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub courses: Arc<dyn CourseCommand>,
    pub courses_query: Arc<dyn CourseQuery>,
    pub feedback: Arc<dyn FeedbackCommand>,
    pub feedback_query: Arc<dyn FeedbackQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub user_admin: Arc<dyn UserAdminCommand>,
    pub analytics: Arc<dyn AnalyticsQuery>,
    pub limits: HttpLimits,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, HttpLimits::default())
    }
}

impl HttpState {
    /// Construct state from a ports bundle and request limits.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use course_feedback::inbound::http::state::{HttpLimits, HttpState, HttpStatePorts};
    /// # fn ports() -> HttpStatePorts { unimplemented!() }
    ///
    /// let state = HttpState::new(ports(), HttpLimits::default());
    /// let _login = Arc::clone(&state.login);
    /// ```
    pub fn new(ports: HttpStatePorts, limits: HttpLimits) -> Self {
        let HttpStatePorts {
            login,
            profile,
            accounts,
            courses,
            courses_query,
            feedback,
            feedback_query,
            users,
            user_admin,
            analytics,
        } = ports;
        Self {
            login,
            profile,
            accounts,
            courses,
            courses_query,
            feedback,
            feedback_query,
            users,
            user_admin,
            analytics,
            limits,
        }
    }

    /// Page request for feedback and user listings.
    pub fn listing_page(&self, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::from_query(page, limit, self.limits.listing)
    }

    /// Page request for the course catalogue.
    pub fn course_page(&self, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::from_query(page, limit, self.limits.courses)
    }
}
