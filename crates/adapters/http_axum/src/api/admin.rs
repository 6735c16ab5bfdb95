//! Admin handlers: approvals, judge accounts and legacy contestants.
//!
//! Every handler here requires an admin session.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use eodsa_app::ports::Backend;
use eodsa_domain::approval::{ApprovalStatus, Decision};
use eodsa_domain::contestant::{Contestant, RosterDancer};
use eodsa_domain::id::{DancerId, StudioId};
use eodsa_domain::judge::Judge;
use eodsa_domain::studio::Studio;

use crate::api::dancers::DancerView;
use crate::api::{JsonResponse, StatusQuery};
use crate::error::ApiError;
use crate::extract::{Body, Caller, Params};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideDancerRequest {
    pub dancer_id: String,
    pub action: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideStudioRequest {
    pub studio_id: String,
    pub action: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJudgeRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct RegisterContestantRequest {
    pub name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub roster: Vec<RosterDancer>,
}

/// `GET /api/admin/dancers?status=`
pub async fn list_dancers<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Params(query): Params<StatusQuery>,
) -> Result<JsonResponse<Vec<DancerView>>, ApiError> {
    caller.admin()?;
    let status = query.parse::<ApprovalStatus>()?;
    let dancers = state.dancers.list_dancers(status).await?;
    Ok(JsonResponse::Ok(Json(
        dancers.into_iter().map(DancerView::from).collect(),
    )))
}

/// `POST /api/admin/dancers`
pub async fn decide_dancer<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<DecideDancerRequest>,
) -> Result<JsonResponse<DancerView>, ApiError> {
    let admin = caller.admin()?;
    let dancer_id = DancerId::parse(&req.dancer_id)?;
    let decision = Decision::from_action(&req.action, req.reason)?;
    let dancer = state.dancers.decide(dancer_id, decision, admin).await?;
    Ok(JsonResponse::Ok(Json(dancer.into())))
}

/// `GET /api/admin/studios?status=`
pub async fn list_studios<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Params(query): Params<StatusQuery>,
) -> Result<JsonResponse<Vec<Studio>>, ApiError> {
    caller.admin()?;
    let status = query.parse::<ApprovalStatus>()?;
    let studios = state.studios.list_studios(status).await?;
    Ok(JsonResponse::Ok(Json(studios)))
}

/// `POST /api/admin/studios`
pub async fn decide_studio<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<DecideStudioRequest>,
) -> Result<JsonResponse<Studio>, ApiError> {
    let admin = caller.admin()?;
    let studio_id = StudioId::parse(&req.studio_id)?;
    let decision = Decision::from_action(&req.action, req.reason)?;
    let studio = state.studios.decide(studio_id, decision, admin).await?;
    Ok(JsonResponse::Ok(Json(studio)))
}

/// `POST /api/admin/judges`
pub async fn create_judge<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<CreateJudgeRequest>,
) -> Result<JsonResponse<Judge>, ApiError> {
    caller.admin()?;
    let judge = state
        .judges
        .create_judge(&req.name, &req.email, &req.password, req.is_admin)
        .await?;
    Ok(JsonResponse::Created(Json(judge)))
}

/// `POST /api/admin/contestants`
pub async fn register_contestant<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<RegisterContestantRequest>,
) -> Result<JsonResponse<Contestant>, ApiError> {
    caller.admin()?;
    let contestant = Contestant::new(&req.name, req.email, req.roster)?;
    let contestant = state.entries.register_contestant(contestant).await?;
    Ok(JsonResponse::Created(Json(contestant)))
}
