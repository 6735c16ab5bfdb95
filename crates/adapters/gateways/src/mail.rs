//! Email delivery through a JSON relay.

use serde::Serialize;

use eodsa_app::ports::{Email, Mailer};
use eodsa_domain::error::EodsaError;

use crate::error::GatewayError;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts each email as `{to, subject, text}` to a relay endpoint.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, GatewayError> {
        Ok(Self {
            client: crate::client()?,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    async fn deliver(&self, email: &Email) -> Result<(), GatewayError> {
        let mut request = self.client.post(&self.endpoint).json(&RelayMessage {
            to: &email.to,
            subject: &email.subject,
            text: &email.body,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Status {
                service: "mail relay",
                status: response.status(),
            });
        }
        Ok(())
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), EodsaError> {
        self.deliver(&email).await?;
        tracing::debug!(subject = %email.subject, "email relayed");
        Ok(())
    }
}

/// Logs emails instead of sending them. Used when no relay is configured.
#[derive(Clone, Default)]
pub struct LoggingMailer;

impl Mailer for LoggingMailer {
    async fn send(&self, email: Email) -> Result<(), EodsaError> {
        tracing::info!(to = %email.to, subject = %email.subject, "email (not sent, no relay configured)");
        Ok(())
    }
}

/// The mailer a deployment runs with, picked at startup.
#[derive(Clone)]
pub enum MailGateway {
    Relay(HttpMailer),
    Log(LoggingMailer),
}

impl MailGateway {
    /// Relay through `endpoint` when one is configured, otherwise log.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn from_endpoint(
        endpoint: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, GatewayError> {
        match endpoint.filter(|e| !e.trim().is_empty()) {
            Some(endpoint) => Ok(Self::Relay(HttpMailer::new(endpoint, api_key)?)),
            None => Ok(Self::Log(LoggingMailer)),
        }
    }
}

impl Mailer for MailGateway {
    async fn send(&self, email: Email) -> Result<(), EodsaError> {
        match self {
            Self::Relay(inner) => inner.send(email).await,
            Self::Log(inner) => inner.send(email).await,
        }
    }
}
