//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `FEEDBACK_*` environment variables over an
//! optional config file. Every accessor applies the documented default, so
//! an empty environment yields a working development server backed by the
//! in-process store.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroize;

use course_feedback::domain::{
    CodeEditPolicy, DEFAULT_MAX_ANALYTICS_DAYS, DEFAULT_MAX_AVATAR_BYTES,
};
use course_feedback::inbound::http::state::HttpLimits;
use pagination::{PageLimits, PaginationError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_COURSE_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_AVATAR_DIR: &str = "uploads/avatars";
const DEFAULT_AVATAR_BASE_URL: &str = "/uploads/avatars";

/// Errors raised while interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    /// Page limits are inconsistent.
    #[error("invalid page limits: {0}")]
    PageLimits(#[from] PaginationError),
    /// The course code policy is not `mutable` or `immutable`.
    #[error("invalid course code policy '{0}'; expected mutable|immutable")]
    CodePolicy(String),
    /// Reading the session key file failed and ephemeral keys are disallowed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short to derive a signing key.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Server configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FEEDBACK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; the in-process store is used without it.
    pub database_url: Option<String>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Drop the `Secure` attribute from the session cookie for plain HTTP development.
    #[ortho_config(default = false)]
    pub insecure_cookie: bool,
    /// Default page size for feedback and user listings.
    pub default_page_limit: Option<u32>,
    /// Default page size for the course catalogue.
    pub default_course_page_limit: Option<u32>,
    /// Largest page size any listing accepts.
    pub max_page_limit: Option<u32>,
    /// Longest analytics window in days.
    pub max_analytics_days: Option<u32>,
    /// `mutable` or `immutable`.
    pub course_code_policy: Option<String>,
    /// Directory that receives uploaded avatars.
    pub avatar_dir: Option<PathBuf>,
    /// Public URL prefix under which `avatar_dir` is served.
    pub avatar_base_url: Option<String>,
    /// Largest accepted avatar upload in bytes.
    pub max_avatar_bytes: Option<usize>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        !self.insecure_cookie
    }

    /// Page bounds and upload cap applied by the HTTP adapter.
    pub fn http_limits(&self) -> Result<HttpLimits, SettingsError> {
        let max = self.max_page_limit.unwrap_or(MAX_PAGE_LIMIT);
        Ok(HttpLimits {
            listing: PageLimits::new(self.default_page_limit.unwrap_or(DEFAULT_PAGE_LIMIT), max)?,
            courses: PageLimits::new(
                self.default_course_page_limit
                    .unwrap_or(DEFAULT_COURSE_PAGE_LIMIT),
                max,
            )?,
            max_avatar_bytes: self.max_avatar_bytes(),
        })
    }

    /// Longest analytics window in days.
    pub fn max_analytics_days(&self) -> u32 {
        self.max_analytics_days
            .unwrap_or(DEFAULT_MAX_ANALYTICS_DAYS)
    }

    /// Largest accepted avatar upload.
    pub fn max_avatar_bytes(&self) -> usize {
        self.max_avatar_bytes.unwrap_or(DEFAULT_MAX_AVATAR_BYTES)
    }

    /// Whether course codes may change after creation.
    pub fn course_code_policy(&self) -> Result<CodeEditPolicy, SettingsError> {
        match self.course_code_policy.as_deref().map(str::trim) {
            None | Some("") => Ok(CodeEditPolicy::default()),
            Some(raw) if raw.eq_ignore_ascii_case("mutable") => Ok(CodeEditPolicy::Mutable),
            Some(raw) if raw.eq_ignore_ascii_case("immutable") => Ok(CodeEditPolicy::Immutable),
            Some(raw) => Err(SettingsError::CodePolicy(raw.to_owned())),
        }
    }

    /// Directory that receives uploaded avatars.
    pub fn avatar_dir(&self) -> PathBuf {
        self.avatar_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AVATAR_DIR))
    }

    /// Public URL prefix for stored avatars.
    pub fn avatar_base_url(&self) -> String {
        self.avatar_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AVATAR_BASE_URL.to_owned())
    }

    /// Path of the session key file.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Session signing key.
    ///
    /// Debug builds, or deployments that opt in with
    /// `session_allow_ephemeral`, fall back to a random key when the file
    /// cannot be read; sessions then do not survive a restart.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        let allow_ephemeral = cfg!(debug_assertions) || self.session_allow_ephemeral;
        load_session_key(&path, allow_ephemeral)
    }
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SettingsError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SettingsError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
