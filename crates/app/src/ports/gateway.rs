//! Gateway ports: outbound collaborators reached over the network.

use std::future::Future;
use std::net::IpAddr;

use eodsa_domain::error::EodsaError;

/// A plain-text notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers notifications. Callers treat failures as non-fatal.
pub trait Mailer {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), EodsaError>> + Send;
}

/// Verifies a reCAPTCHA response token.
pub trait CaptchaVerifier {
    /// Returns `Ok(false)` when the provider rejects the token and `Err`
    /// when the provider could not be reached.
    fn verify(
        &self,
        token: &str,
        remote_ip: Option<IpAddr>,
    ) -> impl Future<Output = Result<bool, EodsaError>> + Send;
}

/// Per-client quota on registration attempts.
///
/// The in-process implementation lives in [`crate::rate_limit`]; deployments
/// running several instances can back this with a shared store.
pub trait RateLimiter {
    /// Record an attempt by `client`, returning `false` when over quota.
    fn try_acquire(&self, client: IpAddr) -> impl Future<Output = Result<bool, EodsaError>> + Send;
}
