//! Judge scoring and the public rankings table.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use eodsa_app::ports::Backend;
use eodsa_domain::id::EntryId;
use eodsa_domain::ranking::Ranking;
use eodsa_domain::score::{Marks, Score};

use crate::api::{EventQuery, JsonResponse};
use crate::error::ApiError;
use crate::extract::{Body, Caller, Params};
use crate::state::AppState;

/// Request body for a score. Each mark is 1 to 10.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub entry_id: String,
    pub technique: i64,
    pub artistry: i64,
    pub presentation: i64,
    pub overall: i64,
    pub comments: Option<String>,
}

/// `POST /api/scores`
///
/// A second submission by the same judge replaces the first.
pub async fn submit<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Body(req): Body<SubmitScoreRequest>,
) -> Result<JsonResponse<Score>, ApiError> {
    let judge_id = caller.judge()?;
    let entry_id = EntryId::parse(&req.entry_id)?;
    let marks = Marks::new(req.technique, req.artistry, req.presentation, req.overall)?;
    let score = state
        .scoring
        .submit_score(judge_id, entry_id, marks, req.comments)
        .await?;
    Ok(JsonResponse::Ok(Json(score)))
}

/// `GET /api/entries/{id}/scores`
pub async fn for_entry<B: Backend>(
    State(state): State<AppState<B>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<JsonResponse<Vec<Score>>, ApiError> {
    caller.judge()?;
    let scores = state
        .scoring
        .scores_for_entry(EntryId::parse(&id)?)
        .await?;
    Ok(JsonResponse::Ok(Json(scores)))
}

/// `GET /api/rankings`
pub async fn rankings<B: Backend>(
    State(state): State<AppState<B>>,
    Params(query): Params<EventQuery>,
) -> Result<JsonResponse<Vec<Ranking>>, ApiError> {
    let filter = query.into_filter()?;
    let table = state.scoring.rankings(&filter).await?;
    Ok(JsonResponse::Ok(Json(table)))
}
