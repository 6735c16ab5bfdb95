//! reCAPTCHA verification.

use std::net::IpAddr;

use serde::Deserialize;

use eodsa_app::ports::CaptchaVerifier;
use eodsa_domain::error::EodsaError;

use crate::error::GatewayError;

pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies tokens against Google's `siteverify` endpoint.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

impl RecaptchaVerifier {
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn new(secret: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_url(RECAPTCHA_VERIFY_URL, secret)
    }

    /// Point at a different `siteverify`-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn with_url(
        verify_url: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            client: crate::client()?,
            verify_url: verify_url.into(),
            secret: secret.into(),
        })
    }

    async fn site_verify(
        &self,
        token: &str,
        remote_ip: Option<IpAddr>,
    ) -> Result<SiteVerifyResponse, GatewayError> {
        let mut form = vec![("secret", self.secret.clone()), ("response", token.to_string())];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip.to_string()));
        }
        let response = self.client.post(&self.verify_url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Status {
                service: "reCAPTCHA",
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }
}

impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> Result<bool, EodsaError> {
        let outcome = self.site_verify(token, remote_ip).await?;
        if !outcome.success {
            tracing::info!(errors = ?outcome.error_codes, "reCAPTCHA token rejected");
        }
        Ok(outcome.success)
    }
}

/// Accepts every token. Used when no reCAPTCHA secret is configured.
#[derive(Clone, Default)]
pub struct PermissiveCaptcha;

impl CaptchaVerifier for PermissiveCaptcha {
    async fn verify(&self, _token: &str, _remote_ip: Option<IpAddr>) -> Result<bool, EodsaError> {
        tracing::debug!("captcha verification disabled, accepting token");
        Ok(true)
    }
}

/// The verifier a deployment runs with, picked at startup.
#[derive(Clone)]
pub enum CaptchaGateway {
    Recaptcha(RecaptchaVerifier),
    Permissive(PermissiveCaptcha),
}

impl CaptchaGateway {
    /// Verify against Google when a secret is configured, otherwise accept
    /// every token.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn from_secret(secret: Option<String>) -> Result<Self, GatewayError> {
        match secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Ok(Self::Recaptcha(RecaptchaVerifier::new(secret)?)),
            None => {
                tracing::warn!("no reCAPTCHA secret configured, registration captcha is not verified");
                Ok(Self::Permissive(PermissiveCaptcha))
            }
        }
    }
}

impl CaptchaVerifier for CaptchaGateway {
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> Result<bool, EodsaError> {
        match self {
            Self::Recaptcha(inner) => inner.verify(token, remote_ip).await,
            Self::Permissive(inner) => inner.verify(token, remote_ip).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;

    async fn stub(body: &'static str) -> String {
        let router = Router::new().route(
            "/siteverify",
            post(move || async move {
                ([("content-type", "application/json")], body)
            }),
        );
        format!("{}/siteverify", serve(router).await)
    }

    #[tokio::test]
    async fn should_accept_successful_verification() {
        let url = stub(r#"{"success": true, "hostname": "eodsa.org"}"#).await;
        let verifier = RecaptchaVerifier::with_url(url, "secret").unwrap();
        assert!(verifier.verify("token", None).await.unwrap());
    }

    #[tokio::test]
    async fn should_report_rejected_token_as_false() {
        let url = stub(r#"{"success": false, "error-codes": ["invalid-input-response"]}"#).await;
        let verifier = RecaptchaVerifier::with_url(url, "secret").unwrap();
        assert!(
            !verifier
                .verify("token", Some("10.0.0.1".parse().unwrap()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn should_fail_when_provider_errors() {
        let router = Router::new().route(
            "/siteverify",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let url = format!("{}/siteverify", serve(router).await);
        let verifier = RecaptchaVerifier::with_url(url, "secret").unwrap();
        assert!(matches!(
            verifier.verify("token", None).await,
            Err(EodsaError::Gateway(_))
        ));
    }

    #[tokio::test]
    async fn should_accept_anything_when_permissive() {
        assert!(PermissiveCaptcha.verify("", None).await.unwrap());
    }

    #[test]
    fn should_fall_back_to_permissive_without_secret() {
        assert!(matches!(
            CaptchaGateway::from_secret(Some("  ".to_string())).unwrap(),
            CaptchaGateway::Permissive(_)
        ));
        assert!(matches!(
            CaptchaGateway::from_secret(Some("s3cret".to_string())).unwrap(),
            CaptchaGateway::Recaptcha(_)
        ));
    }
}
