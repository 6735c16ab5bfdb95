//! Entry submission and the admin's entry management.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use eodsa_app::ports::Backend;
use eodsa_app::services::EntrySubmission;
use eodsa_domain::entry::{EventEntry, ItemDetails, PaymentStatus, Submitter};
use eodsa_domain::error::{EodsaError, ForbiddenError, ValidationError};
use eodsa_domain::id::{ContestantId, EntryId, EventId};
use eodsa_domain::performance::PerformanceType;
use eodsa_domain::session::Principal;

use crate::api::JsonResponse;
use crate::error::ApiError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

/// Request body for an entry submission.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEntryRequest {
    pub event_id: String,
    pub performance_type: Option<PerformanceType>,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(flatten)]
    pub item: ItemDetails,
    /// Set by an admin entering on behalf of a legacy contestant.
    pub contestant_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignItemNumberRequest {
    pub item_number: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_status: PaymentStatus,
}

/// Who an entry is submitted as, given the caller and an optional
/// contestant id.
fn submitter_for(caller: Principal, contestant_id: Option<&str>) -> Result<Submitter, ApiError> {
    match (caller, contestant_id) {
        (Principal::Dancer { id }, None) => Ok(Submitter::Dancer(id)),
        (Principal::Studio { id }, None) => Ok(Submitter::Studio(id)),
        (Principal::Judge { admin: true, .. }, Some(raw)) => {
            Ok(Submitter::Contestant(ContestantId::parse(raw)?))
        }
        (Principal::Judge { admin: true, .. }, None) => Err(ValidationError::EmptyField {
            field: "contestant id",
        }
        .into()),
        _ => Err(EodsaError::from(ForbiddenError::RoleRequired {
            role: "dancer or studio",
        })
        .into()),
    }
}

/// `POST /api/event-entries`
pub async fn submit<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<SubmitEntryRequest>,
) -> Result<JsonResponse<EventEntry>, ApiError> {
    let submitter = submitter_for(caller, req.contestant_id.as_deref())?;
    let submission = EntrySubmission {
        event_id: EventId::parse(&req.event_id)?,
        performance_type: req.performance_type,
        participant_ids: req.participant_ids,
        item: req.item,
    };
    let entry = state.entries.submit(submitter, submission).await?;
    Ok(JsonResponse::Created(Json(entry)))
}

/// `GET /api/event-entries`
pub async fn list_own<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
) -> Result<JsonResponse<Vec<EventEntry>>, ApiError> {
    let submitter = submitter_for(caller, None)?;
    let entries = state.entries.list_for_submitter(submitter).await?;
    Ok(JsonResponse::Ok(Json(entries)))
}

/// `GET /api/admin/events/{id}/entries`
pub async fn list_for_event<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<JsonResponse<Vec<EventEntry>>, ApiError> {
    caller.admin()?;
    let entries = state.entries.list_for_event(EventId::parse(&id)?).await?;
    Ok(JsonResponse::Ok(Json(entries)))
}

/// `PUT /api/admin/entries/{id}/assign-item-number`
pub async fn assign_item_number<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Body(req): Body<AssignItemNumberRequest>,
) -> Result<JsonResponse<EventEntry>, ApiError> {
    caller.admin()?;
    let entry = state
        .entries
        .assign_item_number(EntryId::parse(&id)?, req.item_number)
        .await?;
    Ok(JsonResponse::Ok(Json(entry)))
}

/// `PUT /api/admin/entries/{id}/approve`
pub async fn approve<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<JsonResponse<EventEntry>, ApiError> {
    caller.admin()?;
    let entry = state.entries.approve_entry(EntryId::parse(&id)?).await?;
    Ok(JsonResponse::Ok(Json(entry)))
}

/// `PUT /api/admin/entries/{id}/payment`
pub async fn set_payment<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Body(req): Body<PaymentRequest>,
) -> Result<JsonResponse<EventEntry>, ApiError> {
    caller.admin()?;
    let entry = state
        .entries
        .set_payment_status(EntryId::parse(&id)?, req.payment_status)
        .await?;
    Ok(JsonResponse::Ok(Json(entry)))
}
