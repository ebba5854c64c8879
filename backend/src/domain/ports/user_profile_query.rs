//! Driving port for session resolution and profile reads.

use async_trait::async_trait;

use crate::domain::{Error, Requester, UserId, UserProfile};

/// Domain use-case port for reading the current user's account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Reload the account behind a session so its role is current.
    ///
    /// Fails with `unauthorized` when the account no longer exists.
    async fn resolve_requester(&self, user_id: &UserId) -> Result<Requester, Error>;

    /// Return the requester's public profile.
    async fn fetch_profile(&self, requester: &Requester) -> Result<UserProfile, Error>;
}
