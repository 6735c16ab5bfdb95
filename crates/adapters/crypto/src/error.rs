//! Failures of the cryptographic primitives.

use eodsa_domain::error::EodsaError;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("session secret must be at least {min} bytes")]
    SecretTooShort { min: usize },

    #[error("claims encoding failed")]
    Claims(#[from] serde_json::Error),
}

impl From<CryptoError> for EodsaError {
    fn from(err: CryptoError) -> Self {
        Self::Gateway(Box::new(err))
    }
}
