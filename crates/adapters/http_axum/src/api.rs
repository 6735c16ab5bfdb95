//! JSON REST API handler modules and the `/api` sub-router.

#[allow(clippy::missing_errors_doc)]
pub mod admin;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod dancers;
#[allow(clippy::missing_errors_doc)]
pub mod entries;
#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod scores;
#[allow(clippy::missing_errors_doc)]
pub mod studios;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde::{Deserialize, Serialize};

use eodsa_app::ports::Backend;
use eodsa_domain::error::ValidationError;
use eodsa_domain::event::EventFilter;

use crate::state::AppState;

/// A JSON body with either `200 OK` or `201 Created`.
pub enum JsonResponse<T> {
    Ok(Json<T>),
    Created(Json<T>),
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `?region=&ageCategory=&performanceType=` as shared by the event list and
/// the rankings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub region: Option<String>,
    pub age_category: Option<String>,
    pub performance_type: Option<String>,
}

impl EventQuery {
    /// Blank parameters are treated as absent.
    pub fn into_filter(self) -> Result<EventFilter, ValidationError> {
        let performance_type = non_blank(self.performance_type)
            .map(|raw| raw.parse())
            .transpose()?;
        Ok(EventFilter {
            region: non_blank(self.region),
            age_category: non_blank(self.age_category),
            performance_type,
        })
    }
}

/// `?status=` on the approval and application lists.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl StatusQuery {
    pub fn parse<T>(self) -> Result<Option<T>, ValidationError>
    where
        T: std::str::FromStr<Err = ValidationError>,
    {
        non_blank(self.status).map(|raw| raw.parse()).transpose()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build the `/api` sub-router.
pub fn routes<B: Backend>() -> Router<AppState<B>> {
    Router::new()
        // Sign-in and password resets
        .route("/auth/dancer", post(auth::dancer::<B>))
        .route("/auth/studio", post(auth::studio::<B>))
        .route("/auth/judge", post(auth::judge::<B>))
        .route("/auth/password-reset", post(auth::request_reset::<B>))
        .route(
            "/auth/password-reset/confirm",
            post(auth::confirm_reset::<B>),
        )
        // Dancers
        .route("/dancers/register", post(dancers::register::<B>))
        .route("/dancers/me", get(dancers::me::<B>))
        .route("/dancers/apply-to-studio", post(dancers::apply::<B>))
        .route("/dancers/applications", get(dancers::applications::<B>))
        .route(
            "/dancers/applications/{id}",
            delete(dancers::withdraw::<B>),
        )
        // Studios
        .route("/studios/register", post(studios::register::<B>))
        .route(
            "/studios/applications",
            get(studios::applications::<B>).post(studios::respond::<B>),
        )
        .route("/studios/dancers", get(studios::dancers::<B>))
        // Administration
        .route(
            "/admin/dancers",
            get(admin::list_dancers::<B>).post(admin::decide_dancer::<B>),
        )
        .route(
            "/admin/studios",
            get(admin::list_studios::<B>).post(admin::decide_studio::<B>),
        )
        .route("/admin/judges", post(admin::create_judge::<B>))
        .route("/admin/contestants", post(admin::register_contestant::<B>))
        .route("/admin/events", post(events::create::<B>))
        .route("/admin/events/{id}/status", put(events::set_status::<B>))
        .route(
            "/admin/events/{id}/entries",
            get(entries::list_for_event::<B>),
        )
        .route(
            "/admin/entries/{id}/assign-item-number",
            put(entries::assign_item_number::<B>),
        )
        .route("/admin/entries/{id}/approve", put(entries::approve::<B>))
        .route("/admin/entries/{id}/payment", put(entries::set_payment::<B>))
        // Events and entries
        .route("/events", get(events::list::<B>))
        .route("/events/{id}", get(events::get::<B>))
        .route(
            "/event-entries",
            get(entries::list_own::<B>).post(entries::submit::<B>),
        )
        // Scoring
        .route("/scores", post(scores::submit::<B>))
        .route("/entries/{id}/scores", get(scores::for_entry::<B>))
        .route("/rankings", get(scores::rankings::<B>))
}
