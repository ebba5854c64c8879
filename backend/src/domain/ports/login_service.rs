//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing store, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserProfile};

/// Which accounts a login attempt may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginScope {
    /// Any account role.
    Any,
    /// Administrators only; students are treated as unknown.
    AdminOnly,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    ///
    /// Unknown accounts and wrong passwords fail with `unauthorized`; blocked
    /// accounts fail with `forbidden`.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
        scope: LoginScope,
    ) -> Result<UserProfile, Error>;
}
