//! # eodsa-adapter-gateways
//!
//! HTTP clients for the services the competition backend calls out to:
//! Google reCAPTCHA and a JSON email relay. Each has a local fallback used
//! when the deployment leaves the service unconfigured.

mod captcha;
mod error;
mod mail;

pub use captcha::{CaptchaGateway, PermissiveCaptcha, RECAPTCHA_VERIFY_URL, RecaptchaVerifier};
pub use error::GatewayError;
pub use mail::{HttpMailer, LoggingMailer, MailGateway};

use std::time::Duration;

/// Upper bound on any single outbound call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn client() -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("eodsa/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(GatewayError::from)
}
