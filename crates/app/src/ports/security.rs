//! Security ports: password hashing and session tokens.
//!
//! Both are CPU-bound and synchronous.

use eodsa_domain::error::EodsaError;
use eodsa_domain::session::Principal;

/// One-way password hashing.
pub trait PasswordHasher {
    /// Hash `password` into a self-describing string (algorithm, salt, hash).
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Gateway`] if the primitive fails.
    fn hash(&self, password: &str) -> Result<String, EodsaError>;

    /// Whether `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Issues and verifies signed bearer tokens.
pub trait SessionTokens {
    /// Sign a token for `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Gateway`] if the claims cannot be encoded.
    fn issue(&self, principal: Principal) -> Result<String, EodsaError>;

    /// Check the signature and expiry of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Unauthorized`] for a tampered, malformed or
    /// expired token.
    fn verify(&self, token: &str) -> Result<Principal, EodsaError>;
}
