//! Directory-backed adapter for the `BlobStore` port.
//!
//! Objects live flat in one capability-scoped directory. File names are the
//! hex SHA-256 of a per-upload nonce followed by the content, so identical
//! uploads from two accounts never share a file and removing one cannot
//! break the other. Public URLs are `{base_url}/{file name}`; serving that
//! prefix is left to the fronting web server.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{BlobStore, BlobStoreError, ImageKind};

/// Stores avatar images in a local directory.
#[derive(Clone)]
pub struct CapStdBlobStore {
    dir: Arc<Dir>,
    base_url: String,
}

impl CapStdBlobStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be created or opened.
    pub fn open(path: &Path, base_url: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            dir: Arc::new(dir),
            base_url,
        })
    }

    fn object_name(bytes: &[u8], kind: ImageKind) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(bytes);
        format!("{}.{}", hex::encode(hasher.finalize()), kind.extension())
    }

    /// File name addressed by `url`, if it belongs to this store.
    fn name_for<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.')
            && !name.starts_with('.');
        well_formed.then_some(name)
    }
}

#[async_trait]
impl BlobStore for CapStdBlobStore {
    async fn store(&self, bytes: &[u8], kind: ImageKind) -> Result<String, BlobStoreError> {
        let name = Self::object_name(bytes, kind);
        let dir = Arc::clone(&self.dir);
        let contents = bytes.to_vec();
        let target = name.clone();
        tokio::task::spawn_blocking(move || dir.write(&target, contents))
            .await
            .map_err(|err| BlobStoreError::write(err.to_string()))?
            .map_err(|err| BlobStoreError::write(err.to_string()))?;
        debug!(object = %name, size = bytes.len(), "stored avatar");
        Ok(format!("{}/{name}", self.base_url))
    }

    async fn remove(&self, url: &str) -> Result<(), BlobStoreError> {
        let Some(name) = self.name_for(url) else {
            return Err(BlobStoreError::remove(format!("{url} is not managed by this store")));
        };
        let dir = Arc::clone(&self.dir);
        let target = name.to_owned();
        let outcome = tokio::task::spawn_blocking(move || dir.remove_file(&target))
            .await
            .map_err(|err| BlobStoreError::remove(err.to_string()))?;
        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BlobStoreError::remove(err.to_string())),
        }
    }
}
