// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event routes: campus listings, event details and attendee lists.
//!
//! Event reads work without a session by falling back to an application
//! token. Attendee routes follow the configured participants policy.

use crate::config::ParticipantsAccess;
use crate::error::{AppError, Result};
use crate::middleware::auth::{require_admin, resolve_access_token, AdminUser};
use crate::models::{Event, EventUser};
use crate::services::dashboard::{self, Page, DASHBOARD_PAGE_SIZE};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

/// Event routes (session optional).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/upcoming", get(upcoming_events))
        .route("/events/{event_id}", get(get_event))
}

/// Attendee routes, gated by the configured policy.
pub fn participant_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let routes = Router::new()
        .route("/events/{event_id}/users", get(list_participants))
        .route("/events/{event_id}/users/export", get(export_participants));

    match state.config.participants_access {
        ParticipantsAccess::Admin => {
            routes.route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        }
        ParticipantsAccess::Public => routes,
    }
}

fn default_campus_id() -> u64 {
    1
}
fn default_page() -> u32 {
    1
}
fn default_events_per_page() -> u32 {
    30
}
fn default_participants_per_page() -> u32 {
    100
}

fn validate_paging(page: u32, per_page: u32) -> Result<()> {
    if page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }
    if per_page < 1 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

// ─── Events ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(default = "default_campus_id")]
    campus_id: u64,
    #[serde(default = "default_page")]
    page: u32,
    /// 200 or more switches to full campus aggregation.
    #[serde(default = "default_events_per_page")]
    per_page: u32,
}

/// List a campus's events, most recent first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>> {
    validate_paging(params.page, params.per_page)?;

    tracing::debug!(
        campus_id = params.campus_id,
        page = params.page,
        per_page = params.per_page,
        "Fetching campus events"
    );

    let token = resolve_access_token(&state, &jar).await?;
    let events = state
        .intra
        .fetch_campus_events(&token, params.campus_id, params.page, params.per_page)
        .await?;

    Ok(Json(events))
}

#[derive(Deserialize)]
struct UpcomingQuery {
    #[serde(default = "default_campus_id")]
    campus_id: u64,
    /// Free-text search on name, description and location
    #[serde(default)]
    q: String,
    #[serde(default = "default_page")]
    page: u32,
}

/// Dashboard view: a campus's future events, soonest first, searched and
/// paginated by 30.
async fn upcoming_events(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<UpcomingQuery>,
) -> Result<Json<Page<Event>>> {
    validate_paging(params.page, DASHBOARD_PAGE_SIZE)?;

    let token = resolve_access_token(&state, &jar).await?;
    let events = state
        .intra
        .fetch_all_campus_events(&token, params.campus_id)
        .await?;

    let upcoming = dashboard::upcoming(events, chrono::Utc::now());
    let matching = dashboard::search_events(upcoming, &params.q);

    Ok(Json(dashboard::paginate(
        matching,
        params.page,
        DASHBOARD_PAGE_SIZE,
    )))
}

/// Get a single event.
async fn get_event(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(event_id): Path<u64>,
) -> Result<Json<Event>> {
    let token = resolve_access_token(&state, &jar).await?;
    let event = state.intra.fetch_event(&token, event_id).await?;
    Ok(Json(event))
}

// ─── Participants ────────────────────────────────────────────

#[derive(Deserialize)]
struct ParticipantsQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_participants_per_page")]
    per_page: u32,
}

/// List one page of an event's registrations.
async fn list_participants(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(event_id): Path<u64>,
    Query(params): Query<ParticipantsQuery>,
) -> Result<Json<Vec<EventUser>>> {
    validate_paging(params.page, params.per_page)?;

    let token = resolve_access_token(&state, &jar).await?;
    let participants = state
        .intra
        .fetch_event_users(&token, event_id, params.page, params.per_page)
        .await?;

    Ok(Json(participants))
}

#[derive(Deserialize)]
struct ExportQuery {
    /// Free-text search on login, display name and names
    #[serde(default)]
    q: String,
}

/// Download an event's attendee roster as CSV.
async fn export_participants(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(event_id): Path<u64>,
    Query(params): Query<ExportQuery>,
    admin: Option<Extension<AdminUser>>,
) -> Result<impl IntoResponse> {
    let token = resolve_access_token(&state, &jar).await?;

    let event = state.intra.fetch_event(&token, event_id).await?;
    let participants = state.intra.fetch_all_event_users(&token, event_id).await?;
    let participants = dashboard::search_participants(participants, &params.q);

    // Only present under the admin policy
    let exported_by = admin.map(|Extension(AdminUser(user))| user.login);
    tracing::info!(
        event_id,
        count = participants.len(),
        exported_by = ?exported_by,
        "Exporting attendee roster"
    );

    let disposition = format!(
        "attachment; filename=\"participants-{}.csv\"",
        file_name_safe(&event.name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        dashboard::roster_csv(&participants),
    ))
}

/// Reduce an event name to characters safe in a quoted header file name.
fn file_name_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
