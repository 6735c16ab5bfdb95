//! Argon2id password hashing in PHC string format.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use eodsa_app::ports::PasswordHasher;
use eodsa_domain::error::EodsaError;

use crate::error::CryptoError;

/// Hashes with the crate's default Argon2id parameters.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon: Argon2<'static>,
}

impl Argon2Hasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, EodsaError> {
        // A v4 UUID carries 122 random bits from the OS generator.
        let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
            .map_err(CryptoError::Hash)?;
        let hash = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(CryptoError::Hash)?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(err) => {
                tracing::warn!(error = %err, "stored password hash is malformed");
                false
            }
        }
    }
}
