//! Sign-in and password-reset handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use eodsa_app::ports::Backend;
use eodsa_domain::judge::Judge;
use eodsa_domain::studio::Studio;

use crate::api::JsonResponse;
use crate::api::dancers::DancerView;
use crate::error::ApiError;
use crate::extract::Body;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DancerLoginRequest {
    pub eodsa_id: String,
    pub national_id: String,
}

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct DancerSession {
    pub token: String,
    pub dancer: DancerView,
}

#[derive(Serialize)]
pub struct StudioSession {
    pub token: String,
    pub studio: Studio,
}

#[derive(Serialize)]
pub struct JudgeSession {
    pub token: String,
    pub judge: Judge,
}

/// Possible responses from the reset request endpoint.
pub enum ResetRequestResponse {
    Accepted,
}

impl IntoResponse for ResetRequestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// Possible responses from the reset confirmation endpoint.
pub enum ResetConfirmResponse {
    NoContent,
}

impl IntoResponse for ResetConfirmResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/auth/dancer`
pub async fn dancer<B: Backend>(
    State(state): State<AppState<B>>,
    Body(req): Body<DancerLoginRequest>,
) -> Result<JsonResponse<DancerSession>, ApiError> {
    let session = state
        .auth
        .login_dancer(&req.eodsa_id, &req.national_id)
        .await?;
    Ok(JsonResponse::Ok(Json(DancerSession {
        token: session.token,
        dancer: session.account.into(),
    })))
}

/// `POST /api/auth/studio`
pub async fn studio<B: Backend>(
    State(state): State<AppState<B>>,
    Body(req): Body<CredentialsRequest>,
) -> Result<JsonResponse<StudioSession>, ApiError> {
    let session = state.auth.login_studio(&req.email, &req.password).await?;
    Ok(JsonResponse::Ok(Json(StudioSession {
        token: session.token,
        studio: session.account,
    })))
}

/// `POST /api/auth/judge`
pub async fn judge<B: Backend>(
    State(state): State<AppState<B>>,
    Body(req): Body<CredentialsRequest>,
) -> Result<JsonResponse<JudgeSession>, ApiError> {
    let session = state.auth.login_judge(&req.email, &req.password).await?;
    Ok(JsonResponse::Ok(Json(JudgeSession {
        token: session.token,
        judge: session.account,
    })))
}

/// `POST /api/auth/password-reset`
///
/// Always accepted, whether or not the address has an account.
pub async fn request_reset<B: Backend>(
    State(state): State<AppState<B>>,
    Body(req): Body<ResetRequest>,
) -> Result<ResetRequestResponse, ApiError> {
    state.auth.request_password_reset(&req.email).await?;
    Ok(ResetRequestResponse::Accepted)
}

/// `POST /api/auth/password-reset/confirm`
pub async fn confirm_reset<B: Backend>(
    State(state): State<AppState<B>>,
    Body(req): Body<ResetConfirmRequest>,
) -> Result<ResetConfirmResponse, ApiError> {
    state
        .auth
        .confirm_password_reset(&req.token, &req.new_password)
        .await?;
    Ok(ResetConfirmResponse::NoContent)
}
