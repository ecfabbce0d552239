// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 42 OAuth authentication routes.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{require_session, Session};
use crate::models::User;
use crate::routes::found;
use crate::session::{removal_cookie, session_cookie, session_token};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/auth/process", post(process))
        .route("/auth/logout", get(logout))
        .route("/auth/check", get(check))
        .merge(protected)
}

/// Start OAuth flow - redirect to the 42 authorization page.
async fn login(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!("Starting OAuth flow, redirecting to 42");
    found(&state.oauth.authorization_url())
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token and start the session.
///
/// Every outcome is a redirect; failures land on `/?error=...`.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from 42");
        return found(&format!("/?error={}", urlencoding::encode(&error)));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return found("/?error=no_code");
    };

    match state.oauth.exchange_code(&code).await {
        Ok(token) => {
            tracing::info!(expires_in = token.expires_in, "OAuth successful, session started");
            let jar = jar.add(session_cookie(
                token.access_token,
                token.expires_in,
                state.config.production,
            ));
            (jar, found("/dashboard")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "OAuth callback token exchange failed");
            found("/?error=token_error")
        }
    }
}

#[derive(Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProcessResponse {
    pub success: bool,
}

/// Exchange a code posted by the frontend and start the session.
async fn process(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ProcessResponse>)> {
    let code = payload
        .ok()
        .and_then(|Json(body)| body.code)
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    let token = state.oauth.exchange_code(&code).await?;

    tracing::info!(expires_in = token.expires_in, "Authorization code processed");

    let jar = jar.add(session_cookie(
        token.access_token,
        token.expires_in,
        state.config.production,
    ));

    Ok((jar, Json(ProcessResponse { success: true })))
}

/// Logout - clear the session cookie and go home.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let jar = jar.add(removal_cookie(state.config.production));
    (jar, found("/")).into_response()
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CheckResponse {
    pub authenticated: bool,
}

/// Report whether a session cookie is present. The token is not validated.
async fn check(jar: CookieJar) -> Json<CheckResponse> {
    Json(CheckResponse {
        authenticated: session_token(&jar).is_some(),
    })
}

/// Get the 42 profile of the session user.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<User>> {
    let user = state.intra.fetch_current_user(&session.access_token).await?;
    Ok(Json(user))
}
