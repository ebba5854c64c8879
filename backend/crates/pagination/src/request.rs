//! Normalised page requests.

use thiserror::Error;

/// Errors raised when configuring page limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The default or maximum limit was zero.
    #[error("page limits must be at least 1")]
    ZeroLimit,
    /// The default limit exceeds the maximum.
    #[error("default page limit {default_limit} exceeds maximum {max_limit}")]
    DefaultExceedsMax {
        /// Configured default limit.
        default_limit: u32,
        /// Configured maximum limit.
        max_limit: u32,
    },
}

/// Default and maximum page sizes for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_limit: u32,
    max_limit: u32,
}

impl PageLimits {
    /// Build limits, rejecting zero values and a default above the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when either bound is zero or the default
    /// exceeds the maximum.
    pub const fn new(default_limit: u32, max_limit: u32) -> Result<Self, PaginationError> {
        if default_limit == 0 || max_limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        if default_limit > max_limit {
            return Err(PaginationError::DefaultExceedsMax {
                default_limit,
                max_limit,
            });
        }
        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Limit applied when the caller omits one.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Largest limit a caller may request.
    #[must_use]
    pub const fn max_limit(&self) -> u32 {
        self.max_limit
    }
}

/// A one-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalise raw query values.
    ///
    /// A missing or zero `page` becomes 1. A missing or zero `limit` becomes
    /// the configured default and anything above the maximum is clamped.
    #[must_use]
    pub fn from_query(page: Option<u32>, limit: Option<u32>, limits: PageLimits) -> Self {
        let page = page.filter(|value| *value > 0).unwrap_or(1);
        let limit = limit
            .filter(|value| *value > 0)
            .unwrap_or(limits.default_limit)
            .min(limits.max_limit);
        Self { page, limit }
    }

    /// Build a request directly; zero values are raised to 1.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.limit))
    }
}
