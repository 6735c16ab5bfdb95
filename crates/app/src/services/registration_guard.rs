//! Registration guard: reCAPTCHA and per-client quota for sign-ups.

use std::net::IpAddr;

use eodsa_domain::error::{EodsaError, ValidationError};

use crate::ports::{Backend, CaptchaVerifier, Ports, RateLimiter};

/// Gate in front of dancer and studio registration.
///
/// Failures here always abort the request.
pub struct RegistrationGuard<B: Backend> {
    captcha: B::Captcha,
    limiter: B::Limiter,
}

impl<B: Backend> RegistrationGuard<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            captcha: ports.captcha.clone(),
            limiter: ports.limiter.clone(),
        }
    }

    /// Admit one registration attempt from `client`.
    ///
    /// Only attempts with an accepted captcha count against the quota.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingCaptcha`] when no token was sent
    /// - [`ValidationError::CaptchaRejected`] when the provider says no
    /// - [`EodsaError::Gateway`] when the provider is unreachable
    /// - [`EodsaError::RateLimited`] when `client` is over quota
    pub async fn admit(&self, captcha_token: Option<&str>, client: IpAddr) -> Result<(), EodsaError> {
        let token = captcha_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingCaptcha)?;
        if !self.captcha.verify(token, Some(client)).await? {
            tracing::info!(%client, "captcha rejected");
            return Err(ValidationError::CaptchaRejected.into());
        }
        if !self.limiter.try_acquire(client).await? {
            return Err(EodsaError::RateLimited);
        }
        Ok(())
    }
}
