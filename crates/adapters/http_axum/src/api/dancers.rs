//! Dancer registration and the dancer's own studio applications.

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use eodsa_app::ports::Backend;
use eodsa_app::services::DancerRegistration;
use eodsa_domain::application::StudioApplication;
use eodsa_domain::approval::ApprovalStatus;
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::id::{ApplicationId, DancerId, StudioId};

use crate::api::JsonResponse;
use crate::error::ApiError;
use crate::extract::{Body, Caller, ClientIp};
use crate::state::AppState;

/// Request body for dancer registration.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDancerRequest {
    #[serde(default)]
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_phone: Option<String>,
    pub recaptcha_token: Option<String>,
}

impl From<RegisterDancerRequest> for DancerRegistration {
    fn from(req: RegisterDancerRequest) -> Self {
        Self {
            name: req.name,
            date_of_birth: req.date_of_birth,
            national_id: req.national_id,
            email: req.email,
            phone: req.phone,
            guardian_name: req.guardian_name,
            guardian_email: req.guardian_email,
            guardian_phone: req.guardian_phone,
        }
    }
}

/// New dancers start pending; `approved` turns true only after an admin approves them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DancerRegistered {
    pub id: DancerId,
    pub eodsa_id: EodsaId,
    pub status: ApprovalStatus,
    pub approved: bool,
}

/// A dancer record with the age derived for today.
#[derive(Serialize)]
pub struct DancerView {
    #[serde(flatten)]
    pub dancer: Dancer,
    pub age: u32,
}

impl From<Dancer> for DancerView {
    fn from(dancer: Dancer) -> Self {
        Self {
            age: dancer.age(),
            dancer,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub studio_id: String,
}

/// `POST /api/dancers/register`
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    ClientIp(client): ClientIp,
    Body(req): Body<RegisterDancerRequest>,
) -> Result<JsonResponse<DancerRegistered>, ApiError> {
    state
        .guard
        .admit(req.recaptcha_token.as_deref(), client)
        .await?;
    let dancer = state.dancers.register(req.into()).await?;
    Ok(JsonResponse::Created(Json(DancerRegistered {
        id: dancer.id,
        approved: dancer.is_approved(),
        status: dancer.approval.status,
        eodsa_id: dancer.eodsa_id,
    })))
}

/// `GET /api/dancers/me`
pub async fn me<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
) -> Result<JsonResponse<DancerView>, ApiError> {
    let dancer = state.dancers.get_dancer(caller.dancer()?).await?;
    Ok(JsonResponse::Ok(Json(dancer.into())))
}

/// `POST /api/dancers/apply-to-studio`
pub async fn apply<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<ApplyRequest>,
) -> Result<JsonResponse<StudioApplication>, ApiError> {
    let dancer_id = caller.dancer()?;
    let studio_id = StudioId::parse(&req.studio_id)?;
    let application = state.applications.apply(dancer_id, studio_id).await?;
    Ok(JsonResponse::Created(Json(application)))
}

/// `GET /api/dancers/applications`
pub async fn applications<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
) -> Result<JsonResponse<Vec<StudioApplication>>, ApiError> {
    let applications = state
        .applications
        .list_for_dancer(caller.dancer()?)
        .await?;
    Ok(JsonResponse::Ok(Json(applications)))
}

/// `DELETE /api/dancers/applications/{id}`
pub async fn withdraw<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<JsonResponse<StudioApplication>, ApiError> {
    let dancer_id = caller.dancer()?;
    let application_id = ApplicationId::parse(&id)?;
    let application = state
        .applications
        .withdraw(dancer_id, application_id)
        .await?;
    Ok(JsonResponse::Ok(Json(application)))
}
