//! Driving port for admin account moderation.

use async_trait::async_trait;

use crate::domain::{Error, Requester, UserId, UserProfile};

/// Admin-only account mutations. Administrator accounts are never targets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminCommand: Send + Sync {
    /// Flip the block flag and return the updated account.
    async fn toggle_block(&self, requester: &Requester, id: &UserId)
    -> Result<UserProfile, Error>;

    /// Delete an account and, first, all of its feedback.
    async fn delete_user(&self, requester: &Requester, id: &UserId) -> Result<(), Error>;
}
