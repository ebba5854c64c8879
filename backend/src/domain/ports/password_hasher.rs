//! Credential service port: hash and verify account passwords.

use crate::domain::{NewPassword, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes new passwords and checks candidates against stored hashes.
///
/// Hashing is CPU-bound; callers on the async runtime should keep work per
/// request small rather than batching.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a validated password.
    fn hash(&self, password: &NewPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `candidate` matches `hash`.
    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
