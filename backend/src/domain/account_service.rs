//! Account domain service: registration, login, session resolution and
//! profile maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::service_support::{
    Repositories, map_blob_error, map_hasher_error, map_user_error,
};
use crate::domain::ports::{
    AccountCommand, BlobStore, ImageKind, LoginScope, LoginService, PasswordHasher,
    UserProfileQuery,
};
use crate::domain::{
    AvatarUpload, Error, LoginCredentials, PasswordChange, ProfilePatch, Registration, Requester,
    Role, User, UserId, UserProfile,
};

/// Upload ceiling applied when none is configured.
pub const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Account service implementing the authentication and profile ports.
#[derive(Clone)]
pub struct AccountService {
    repos: Repositories,
    hasher: Arc<dyn PasswordHasher>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    max_avatar_bytes: usize,
}

impl AccountService {
    /// Create a service over the given collaborators.
    pub fn new(
        repos: Repositories,
        hasher: Arc<dyn PasswordHasher>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            hasher,
            blobs,
            clock,
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        }
    }

    /// Override the avatar size ceiling.
    pub fn with_max_avatar_bytes(mut self, max_avatar_bytes: usize) -> Self {
        self.max_avatar_bytes = max_avatar_bytes;
        self
    }

    fn avatar_error(message: &str) -> Error {
        Error::invalid_request(message).with_details(json!({ "fields": { "avatar": message } }))
    }

    fn check_avatar(&self, upload: &AvatarUpload) -> Result<ImageKind, Error> {
        if upload.bytes.is_empty() {
            return Err(Self::avatar_error("Please upload an image"));
        }
        let Some(kind) = ImageKind::from_mime(&upload.content_type) else {
            return Err(Self::avatar_error("Only image files are allowed"));
        };
        if upload.bytes.len() > self.max_avatar_bytes {
            return Err(Self::avatar_error("Image exceeds the maximum upload size"));
        }
        Ok(kind)
    }

    async fn save(&self, user: &User) -> Result<(), Error> {
        self.repos.users.update(user).await.map_err(map_user_error)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
        scope: LoginScope,
    ) -> Result<UserProfile, Error> {
        let rejected = || match scope {
            LoginScope::Any => Error::unauthorized("Invalid credentials"),
            LoginScope::AdminOnly => Error::unauthorized("Invalid admin credentials"),
        };

        let user = self
            .repos
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .filter(|user| scope == LoginScope::Any || user.is_admin())
            .ok_or_else(rejected)?;

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(rejected());
        }
        if user.is_blocked {
            warn!(user_id = %user.id, "blocked account attempted to log in");
            return Err(Error::forbidden("Your account has been blocked"));
        }

        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(user.profile())
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, registration: &Registration) -> Result<UserProfile, Error> {
        let valid = registration.validate()?;
        let hash = self.hasher.hash(&valid.password).map_err(map_hasher_error)?;
        let user = User::new(
            valid.name,
            valid.email,
            hash,
            Role::Student,
            self.clock.utc(),
        );
        self.repos
            .users
            .insert(&user)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "student registered");
        Ok(user.profile())
    }

    async fn update_profile(
        &self,
        requester: &Requester,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, Error> {
        let changes = patch.validate()?;
        let mut user = self.repos.active_requester(requester).await?;
        changes.apply(&mut user);
        self.save(&user).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user.profile())
    }

    async fn change_password(
        &self,
        requester: &Requester,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        let valid = change.validate()?;
        let mut user = self.repos.active_requester(requester).await?;
        let matches = self
            .hasher
            .verify(&valid.current_password, &user.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::invalid_request("Current password is incorrect").with_details(
                json!({ "fields": { "currentPassword": "Current password is incorrect" } }),
            ));
        }
        user.password_hash = self
            .hasher
            .hash(&valid.new_password)
            .map_err(map_hasher_error)?;
        self.save(&user).await?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }

    async fn upload_avatar(
        &self,
        requester: &Requester,
        upload: AvatarUpload,
    ) -> Result<String, Error> {
        let kind = self.check_avatar(&upload)?;
        let mut user = self.repos.active_requester(requester).await?;

        let url = self
            .blobs
            .store(&upload.bytes, kind)
            .await
            .map_err(map_blob_error)?;
        let previous = user.profile_picture_url.replace(url.clone());

        if let Err(error) = self.save(&user).await {
            if let Err(cleanup) = self.blobs.remove(&url).await {
                warn!(%url, error = %cleanup, "failed to remove orphaned avatar");
            }
            return Err(error);
        }
        if let Some(previous) = previous.filter(|old| *old != url)
            && let Err(error) = self.blobs.remove(&previous).await
        {
            warn!(url = %previous, %error, "failed to remove previous avatar");
        }

        info!(user_id = %user.id, "avatar uploaded");
        Ok(url)
    }
}

#[async_trait]
impl UserProfileQuery for AccountService {
    async fn resolve_requester(&self, user_id: &UserId) -> Result<Requester, Error> {
        let requester = Requester::new(*user_id, Role::Student);
        Ok(self.repos.requester_account(&requester).await?.requester())
    }

    async fn fetch_profile(&self, requester: &Requester) -> Result<UserProfile, Error> {
        Ok(self.repos.requester_account(requester).await?.profile())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
