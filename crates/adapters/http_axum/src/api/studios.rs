//! Studio registration and the studio side of dancer applications.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use eodsa_app::ports::Backend;
use eodsa_app::services::StudioRegistration;
use eodsa_domain::application::{ApplicationStatus, Response, StudioApplication};
use eodsa_domain::id::{ApplicationId, StudioId};
use eodsa_domain::studio::RegistrationNumber;

use crate::api::dancers::DancerView;
use crate::api::{JsonResponse, StatusQuery};
use crate::error::ApiError;
use crate::extract::{Body, Caller, ClientIp, Params};
use crate::state::AppState;

/// Request body for studio registration.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudioRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<String>,
    #[serde(default)]
    pub password: String,
    pub recaptcha_token: Option<String>,
}

impl From<RegisterStudioRequest> for StudioRegistration {
    fn from(req: RegisterStudioRequest) -> Self {
        Self {
            name: req.name,
            contact_person: req.contact_person,
            email: req.email,
            phone: req.phone,
            address: req.address,
            password: req.password,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioRegistered {
    pub id: StudioId,
    pub registration_number: RegistrationNumber,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub application_id: String,
    pub action: String,
    pub reason: Option<String>,
}

/// `POST /api/studios/register`
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    ClientIp(client): ClientIp,
    Body(req): Body<RegisterStudioRequest>,
) -> Result<JsonResponse<StudioRegistered>, ApiError> {
    state
        .guard
        .admit(req.recaptcha_token.as_deref(), client)
        .await?;
    let studio = state.studios.register(req.into()).await?;
    Ok(JsonResponse::Created(Json(StudioRegistered {
        id: studio.id,
        registration_number: studio.registration_number,
    })))
}

/// `GET /api/studios/applications?status=`
pub async fn applications<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Params(query): Params<StatusQuery>,
) -> Result<JsonResponse<Vec<StudioApplication>>, ApiError> {
    let studio_id = caller.studio()?;
    let status = query.parse::<ApplicationStatus>()?;
    let applications = state
        .applications
        .list_for_studio(studio_id, status)
        .await?;
    Ok(JsonResponse::Ok(Json(applications)))
}

/// `POST /api/studios/applications`
pub async fn respond<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<RespondRequest>,
) -> Result<JsonResponse<StudioApplication>, ApiError> {
    let studio_id = caller.studio()?;
    let application_id = ApplicationId::parse(&req.application_id)?;
    let response = Response::from_action(&req.action, req.reason)?;
    let application = state
        .applications
        .respond(studio_id, application_id, response)
        .await?;
    Ok(JsonResponse::Ok(Json(application)))
}

/// `GET /api/studios/dancers`
pub async fn dancers<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
) -> Result<JsonResponse<Vec<DancerView>>, ApiError> {
    let dancers = state
        .applications
        .affiliated_dancers(caller.studio()?)
        .await?;
    Ok(JsonResponse::Ok(Json(
        dancers.into_iter().map(DancerView::from).collect(),
    )))
}
