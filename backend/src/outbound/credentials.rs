//! Argon2id adapter for the `PasswordHasher` port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{NewPassword, PasswordHash};

/// Hashes passwords into PHC strings with a fresh random salt each time.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Option<Params>,
}

impl Argon2PasswordHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters.
    ///
    /// Verification always reads the parameters embedded in the stored hash,
    /// so raising costs later keeps old hashes usable.
    pub fn with_params(params: Params) -> Self {
        Self {
            params: Some(params),
        }
    }

    fn engine(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            None => Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &NewPassword) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .engine()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify(&self, candidate: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match self.engine().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        // Minimum costs keep the suite fast.
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("params");
        Argon2PasswordHasher::with_params(params)
    }

    fn password() -> NewPassword {
        NewPassword::new("Student123!").expect("strong password")
    }

    #[rstest]
    fn hash_is_phc_encoded_argon2id(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password()).expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[rstest]
    fn verify_accepts_the_original_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password()).expect("hash");
        assert!(hasher.verify("Student123!", &hash).expect("verify"));
        assert!(!hasher.verify("Student123?", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password()).expect("hash");
        let second = hasher.hash(&password()).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn garbage_hash_is_malformed(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("Student123!", &PasswordHash::new("not-a-phc-string"))
            .expect_err("malformed");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
