// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod events;

use crate::config::Config;
use crate::AppState;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// `302 Found` redirect.
pub(crate) fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location, "Invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Loopback origins a local frontend dev server runs on.
const DEV_HOSTS: [&str; 2] = ["http://localhost", "http://127.0.0.1"];

/// Whether a browser origin may call the API with credentials.
///
/// Outside production, loopback origins on any port are also accepted. The
/// host must match exactly: `http://localhost.example.com` is not loopback.
fn origin_allowed(config: &Config, origin: &str) -> bool {
    if origin == config.frontend_url.trim_end_matches('/') {
        return true;
    }
    if config.production {
        return false;
    }

    DEV_HOSTS.iter().any(|host| match origin.strip_prefix(host) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    })
}

/// CORS for the dashboard frontend. Session cookies ride along, so origins
/// are matched explicitly rather than with a wildcard.
fn cors_layer(config: Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| origin_allowed(&config, origin))
                .unwrap_or(false)
        }))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .merge(auth::routes())
        .merge(events::routes())
        .merge(events::participant_routes(&state));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors_layer(state.config.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
