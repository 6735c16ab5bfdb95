use eodsa_domain::error::EodsaError;

/// Failures talking to an outbound service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} answered with status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },
}

impl From<GatewayError> for EodsaError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(Box::new(err))
    }
}
