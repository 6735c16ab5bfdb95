//! JSON REST handlers for events.

use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use eodsa_app::ports::Backend;
use eodsa_domain::event::{Event, EventStatus};
use eodsa_domain::id::EventId;
use eodsa_domain::performance::PerformanceType;

use crate::api::{EventQuery, JsonResponse};
use crate::error::ApiError;
use crate::extract::{Body, Caller, Params};
use crate::state::AppState;

/// Request body for creating an event.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub region: String,
    pub age_category: String,
    pub performance_type: PerformanceType,
    pub event_date: NaiveDate,
    pub registration_deadline: NaiveDate,
    pub venue: String,
    pub entry_fee: Decimal,
    pub status: Option<EventStatus>,
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: EventStatus,
}

/// `GET /api/events`
pub async fn list<B: Backend>(
    State(state): State<AppState<B>>,
    Params(query): Params<EventQuery>,
) -> Result<JsonResponse<Vec<Event>>, ApiError> {
    let filter = query.into_filter()?;
    let events = state.events.list_events(&filter).await?;
    Ok(JsonResponse::Ok(Json(events)))
}

/// `GET /api/events/{id}`
pub async fn get<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<JsonResponse<Event>, ApiError> {
    let event = state.events.get_event(EventId::parse(&id)?).await?;
    Ok(JsonResponse::Ok(Json(event)))
}

/// `POST /api/admin/events`
pub async fn create<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<CreateEventRequest>,
) -> Result<JsonResponse<Event>, ApiError> {
    let admin = caller.admin()?;
    let mut builder = Event::builder()
        .name(req.name)
        .description(req.description)
        .region(req.region)
        .age_category(req.age_category)
        .performance_type(req.performance_type)
        .event_date(req.event_date)
        .registration_deadline(req.registration_deadline)
        .venue(req.venue)
        .entry_fee(req.entry_fee)
        .created_by(admin);
    if let Some(status) = req.status {
        builder = builder.status(status);
    }
    let event = state.events.create_event(builder.build()?).await?;
    Ok(JsonResponse::Created(Json(event)))
}

/// `PUT /api/admin/events/{id}/status`
pub async fn set_status<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Body(req): Body<SetStatusRequest>,
) -> Result<JsonResponse<Event>, ApiError> {
    caller.admin()?;
    let event = state
        .events
        .set_status(EventId::parse(&id)?, req.status)
        .await?;
    Ok(JsonResponse::Ok(Json(event)))
}
