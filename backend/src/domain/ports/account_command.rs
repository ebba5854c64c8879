//! Driving port for self-service account changes.

use async_trait::async_trait;

use crate::domain::{
    AvatarUpload, Error, PasswordChange, ProfilePatch, Registration, Requester, UserProfile,
};

/// Domain use-case port for registration and profile maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a student account.
    async fn register(&self, registration: &Registration) -> Result<UserProfile, Error>;

    /// Apply a partial profile update to the requester's account.
    async fn update_profile(
        &self,
        requester: &Requester,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, Error>;

    /// Replace the requester's password after verifying the current one.
    async fn change_password(
        &self,
        requester: &Requester,
        change: &PasswordChange,
    ) -> Result<(), Error>;

    /// Store a new profile picture and return its URL.
    async fn upload_avatar(
        &self,
        requester: &Requester,
        upload: AvatarUpload,
    ) -> Result<String, Error>;
}
