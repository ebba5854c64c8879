//! Blob store port for uploaded profile images.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// Writing the object failed.
        Write { message: String } => "blob write failed: {message}",
        /// Removing the object failed.
        Remove { message: String } => "blob removal failed: {message}",
    }
}

/// Image content types accepted for avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Recognise a MIME type; parameters such as `; charset` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// File extension used for stored objects.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Stores image bytes and hands back a public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return the URL clients use to fetch them.
    async fn store(&self, bytes: &[u8], kind: ImageKind) -> Result<String, BlobStoreError>;

    /// Invalidate an object previously returned by [`BlobStore::store`].
    async fn remove(&self, url: &str) -> Result<(), BlobStoreError>;
}
