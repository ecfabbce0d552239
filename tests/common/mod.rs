// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use campus_events::config::Config;
use campus_events::routes::create_router;
use campus_events::services::{IntraClient, PagingPolicy};
use campus_events::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Config pointing the upstream clients at a mock server.
#[allow(dead_code)]
pub fn test_config(upstream: &str) -> Config {
    Config {
        api_base_url: upstream.to_string(),
        ..Config::default()
    }
}

/// Paging policy with the production cap but no cooldown.
#[allow(dead_code)]
pub fn fast_paging() -> PagingPolicy {
    PagingPolicy {
        delay: Duration::ZERO,
        ..PagingPolicy::default()
    }
}

/// Create a test app against a mock upstream.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let mut state = AppState::new(config);
    state.intra = state.intra.clone().with_paging(fast_paging());
    let state = Arc::new(state);
    (create_router(state.clone()), state)
}

/// A bare upstream client against a mock server.
#[allow(dead_code)]
pub fn test_client(upstream: &str) -> IntraClient {
    IntraClient::new(reqwest::Client::new(), upstream).with_paging(fast_paging())
}

/// Upstream event JSON.
#[allow(dead_code)]
pub fn event_json(id: u64, campus_ids: &[u64], begin_at: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Event {}", id),
        "description": "<p>Come along</p>",
        "location": "Cluster 3",
        "kind": "event",
        "max_people": 50,
        "nbr_subscribers": 3,
        "begin_at": begin_at,
        "end_at": begin_at,
        "campus_ids": campus_ids,
        "cursus_ids": [21]
    })
}

/// A page of `count` events starting at `first_id`; every `every`-th one is on
/// `campus_id`, the rest on campus 99.
#[allow(dead_code)]
pub fn events_page(first_id: u64, count: u64, campus_id: u64, every: u64) -> Value {
    Value::Array(
        (first_id..first_id + count)
            .map(|id| {
                let campus = if (id - first_id) % every == 0 {
                    campus_id
                } else {
                    99
                };
                event_json(id, &[campus], "2030-01-01T10:00:00.000Z")
            })
            .collect(),
    )
}

/// Upstream user JSON.
#[allow(dead_code)]
pub fn user_json(id: u64, login: &str) -> Value {
    json!({
        "id": id,
        "login": login,
        "email": format!("{}@student.42.fr", login),
        "first_name": "Jane",
        "last_name": "Doe",
        "displayname": "Jane Doe",
        "image": { "link": null, "versions": {} },
        "staff?": false
    })
}

/// Upstream registration JSON.
#[allow(dead_code)]
pub fn event_user_json(id: u64, event_id: u64, login: &str) -> Value {
    json!({
        "id": id,
        "event_id": event_id,
        "user_id": id,
        "user": user_json(id, login)
    })
}

/// Upstream token JSON.
#[allow(dead_code)]
pub fn token_json(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "public",
        "created_at": 1_760_000_000
    })
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}
