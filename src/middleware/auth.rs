// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware and token resolution.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::session::session_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Access token taken from the session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
}

/// Session user that passed the admin check.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Middleware that requires a session cookie.
///
/// A missing cookie is reported as 401 "Not authenticated"; the token itself
/// is not validated here.
pub async fn require_session(jar: CookieJar, mut request: Request, next: Next) -> Result<Response> {
    let access_token = session_token(&jar).ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(Session { access_token });

    Ok(next.run(request).await)
}

/// Middleware that requires a session whose 42 login is a configured admin.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let access_token = session_token(&jar).ok_or(AppError::Unauthenticated)?;

    let user = state.intra.fetch_current_user(&access_token).await?;

    if !state.config.is_admin(&user.login) {
        tracing::warn!(login = %user.login, "Blocked attendee list request from non-admin");
        return Err(AppError::Forbidden);
    }

    tracing::debug!(login = %user.login, "Admin access granted");

    request.extensions_mut().insert(Session { access_token });
    request.extensions_mut().insert(AdminUser(user));

    Ok(next.run(request).await)
}

/// Token for a public read: the session's when present, otherwise a fresh
/// application token from the client-credentials grant.
pub async fn resolve_access_token(state: &AppState, jar: &CookieJar) -> Result<String> {
    if let Some(token) = session_token(jar) {
        return Ok(token);
    }

    tracing::debug!("No session cookie, using client credentials for anonymous read");
    let token = state.oauth.client_credentials_token().await?;
    Ok(token.access_token)
}
