//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eodsa_domain::error::{AuthError, EodsaError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`EodsaError`] (and undecodable requests) to an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    Domain(EodsaError),
    /// The request body or query string could not be decoded.
    Malformed(String),
}

impl From<EodsaError> for ApiError {
    fn from(err: EodsaError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let err = match self {
            Self::Malformed(message) => return (StatusCode::BAD_REQUEST, message.clone()),
            Self::Domain(err) => err,
        };
        let status = match err {
            EodsaError::Validation(_) => StatusCode::BAD_REQUEST,
            EodsaError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EodsaError::Forbidden(_) => StatusCode::FORBIDDEN,
            EodsaError::NotFound(_) => StatusCode::NOT_FOUND,
            EodsaError::Conflict(_) => StatusCode::CONFLICT,
            EodsaError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            EodsaError::Storage(source) => {
                tracing::error!(error = %source, "storage error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                );
            }
            EodsaError::Gateway(source) => {
                tracing::error!(error = %source, "gateway error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                );
            }
        };
        (status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eodsa_domain::error::{ConflictError, ForbiddenError, NotFoundError};

    fn status(err: impl Into<EodsaError>) -> StatusCode {
        ApiError::from(err.into()).into_response().status()
    }

    #[test]
    fn should_map_error_families_to_status_codes() {
        assert_eq!(status(ValidationError::MissingCaptcha), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::ExpiredToken), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(ForbiddenError::RoleRequired { role: "admin" }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(NotFoundError {
                entity: "Event",
                id: "x".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(ConflictError::AlreadyApplied), StatusCode::CONFLICT);
        assert_eq!(status(EodsaError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn should_hide_storage_details() {
        let err = ApiError::from(EodsaError::storage(std::io::Error::other("disk on fire")));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal server error");
    }

    #[test]
    fn should_reject_malformed_body_as_bad_request() {
        let response = ApiError::Malformed("missing field `name`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
