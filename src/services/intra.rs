// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 42 API client for reading users, events and registrations.
//!
//! Handles:
//! - Bearer-authenticated reads of `/v2` endpoints
//! - Local campus filtering (the events list has no campus filter)
//! - Multi-page campus aggregation with a fixed cooldown and a page cap
//! - Structured error kinds, including rate limit detection

use crate::models::{Event, EventUser, User};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Largest page the events endpoint serves.
pub const MAX_UPSTREAM_PER_PAGE: u32 = 100;

/// `per_page` at or above which a campus listing switches to aggregation.
pub const AGGREGATE_THRESHOLD: u32 = 200;

/// Over-fetch factor compensating for the local campus filter.
const CAMPUS_OVERFETCH: u32 = 3;

/// Upstream failure kinds.
#[derive(Debug, thiserror::Error)]
pub enum IntraError {
    #[error("42 API rejected the access token")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("42 API rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("Invalid response format: expected array")]
    InvalidResponseShape,

    #[error("Event {event_id} has more than {limit} registrations")]
    RosterTooLarge { event_id: u64, limit: usize },

    #[error("{0}")]
    TokenExchange(String),

    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(String),
}

/// Static backpressure for campus aggregation.
#[derive(Debug, Clone, Copy)]
pub struct PagingPolicy {
    /// Events requested per upstream page
    pub page_size: u32,
    /// Hard cap on upstream page requests
    pub max_pages: u32,
    /// Pause between successful pages
    pub delay: Duration,
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            page_size: MAX_UPSTREAM_PER_PAGE,
            max_pages: 10,
            delay: Duration::from_millis(200),
        }
    }
}

/// 42 API client.
#[derive(Clone)]
pub struct IntraClient {
    http: reqwest::Client,
    base_url: String,
    paging: PagingPolicy,
}

impl IntraClient {
    /// Create a client for the API rooted at `base_url` (e.g. `https://api.intra.42.fr`).
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/v2", base_url.trim_end_matches('/')),
            paging: PagingPolicy::default(),
        }
    }

    /// Replace the aggregation policy.
    pub fn with_paging(mut self, paging: PagingPolicy) -> Self {
        self.paging = paging;
        self
    }

    pub fn paging(&self) -> PagingPolicy {
        self.paging
    }

    /// Get the user the token belongs to.
    pub async fn fetch_current_user(&self, access_token: &str) -> Result<User, IntraError> {
        let url = format!("{}/me", self.base_url);
        let response = self.get(&url, access_token, &[]).await?;
        check_response_json(response, "Current user").await
    }

    /// Get a single event by ID.
    pub async fn fetch_event(&self, access_token: &str, event_id: u64) -> Result<Event, IntraError> {
        let url = format!("{}/events/{}", self.base_url, event_id);
        let response = self.get(&url, access_token, &[]).await?;
        check_response_json(response, &format!("Event {}", event_id)).await
    }

    /// List registrations for an event (one upstream page).
    pub async fn fetch_event_users(
        &self,
        access_token: &str,
        event_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<EventUser>, IntraError> {
        let url = format!("{}/events/{}/events_users", self.base_url, event_id);
        let response = self
            .get(
                &url,
                access_token,
                &[("page", page.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;

        check_response_array(response, &format!("Event {}", event_id)).await
    }

    /// Every registration of an event, for export.
    ///
    /// Pages through the list under the same policy as campus aggregation.
    /// Unlike it, a partial roster is not a valid export: a rate limit fails
    /// the whole call, and so does a full page at the page cap, since the
    /// list may continue past it.
    pub async fn fetch_all_event_users(
        &self,
        access_token: &str,
        event_id: u64,
    ) -> Result<Vec<EventUser>, IntraError> {
        let PagingPolicy {
            page_size,
            max_pages,
            delay,
        } = self.paging;

        let mut participants = Vec::new();

        for page in 1..=max_pages {
            let batch = self
                .fetch_event_users(access_token, event_id, page, page_size)
                .await?;
            let fetched = batch.len();
            participants.extend(batch);

            if fetched < page_size as usize {
                return Ok(participants);
            }

            if page < max_pages && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::warn!(
            event_id,
            max_pages,
            collected = participants.len(),
            "Attendee list reaches the page cap, refusing partial roster"
        );
        Err(IntraError::RosterTooLarge {
            event_id,
            limit: participants.len(),
        })
    }

    /// List events held on a campus, most recent first.
    ///
    /// Requests for `per_page >= 200` aggregate every campus event through
    /// [`fetch_all_campus_events`](Self::fetch_all_campus_events) and ignore
    /// `page`. Smaller requests over-fetch a single upstream page, filter it
    /// locally and truncate to `per_page`.
    pub async fn fetch_campus_events(
        &self,
        access_token: &str,
        campus_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Event>, IntraError> {
        if per_page >= AGGREGATE_THRESHOLD {
            return self.fetch_all_campus_events(access_token, campus_id).await;
        }

        let upstream_per_page = per_page
            .saturating_mul(CAMPUS_OVERFETCH)
            .min(MAX_UPSTREAM_PER_PAGE);
        let events = self
            .fetch_events_page(access_token, page, upstream_per_page)
            .await?;

        Ok(events
            .into_iter()
            .filter(|event| event.is_on_campus(campus_id))
            .take(per_page as usize)
            .collect())
    }

    /// Collect every event of a campus, page by page.
    ///
    /// Stops at the first short page, after `max_pages` requests, or on a
    /// rate limit. A rate limit is not an error here: whatever was collected
    /// so far is returned. Only one raw page is held at a time.
    pub async fn fetch_all_campus_events(
        &self,
        access_token: &str,
        campus_id: u64,
    ) -> Result<Vec<Event>, IntraError> {
        let PagingPolicy {
            page_size,
            max_pages,
            delay,
        } = self.paging;

        let mut campus_events = Vec::new();

        for page in 1..=max_pages {
            let events = match self.fetch_events_page(access_token, page, page_size).await {
                Ok(events) => events,
                Err(IntraError::RateLimited { .. }) => {
                    tracing::warn!(
                        campus_id,
                        page,
                        collected = campus_events.len(),
                        "42 API rate limit hit, returning partial campus events"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let fetched = events.len();
            campus_events.extend(events.into_iter().filter(|e| e.is_on_campus(campus_id)));

            tracing::debug!(
                campus_id,
                page,
                fetched,
                collected = campus_events.len(),
                "Fetched campus events page"
            );

            if fetched < page_size as usize {
                break;
            }

            if page < max_pages && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(campus_events)
    }

    /// One raw page of `/v2/events`, most recent first.
    async fn fetch_events_page(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Event>, IntraError> {
        let url = format!("{}/events", self.base_url);
        let response = self
            .get(
                &url,
                access_token,
                &[
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    ("sort", "-begin_at".to_string()),
                ],
            )
            .await?;

        check_response_array(response, "Events").await
    }

    /// Issue an authenticated GET.
    async fn get(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, IntraError> {
        self.http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| IntraError::Transport(e.to_string()))
    }
}

/// Map a non-success response to its error kind.
pub(crate) async fn error_for_status(response: reqwest::Response, what: &str) -> IntraError {
    let status = response.status();

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            tracing::warn!(retry_after = ?retry_after, "42 API rate limit hit (429)");
            IntraError::RateLimited { retry_after }
        }
        StatusCode::UNAUTHORIZED => IntraError::Unauthorized,
        StatusCode::NOT_FOUND => IntraError::NotFound(what.to_string()),
        _ => {
            let body = response.text().await.unwrap_or_default();
            IntraError::Upstream {
                status: status.as_u16(),
                message: upstream_message(status, &body),
            }
        }
    }
}

/// Extract a readable message from an upstream error body.
///
/// Prefers the JSON `message` then `error` field, then the raw body, then
/// the status line.
pub(crate) fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, IntraError> {
    if !response.status().is_success() {
        return Err(error_for_status(response, what).await);
    }

    response
        .json()
        .await
        .map_err(|e| IntraError::Decode(e.to_string()))
}

/// Check response status and parse a JSON array body.
async fn check_response_array<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<Vec<T>, IntraError> {
    let value: serde_json::Value = check_response_json(response, what).await?;

    if !value.is_array() {
        tracing::error!(body = %value, "42 API returned non-array response");
        return Err(IntraError::InvalidResponseShape);
    }

    serde_json::from_value(value).map_err(|e| IntraError::Decode(e.to_string()))
}
