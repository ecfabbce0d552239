// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::intra::IntraError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Code is required")]
    MissingCode,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("429 Too Many Requests (rate limit exceeded), please retry shortly")]
    RateLimited { retry_after: Option<u64> },

    #[error("Failed to get access token: {0}")]
    TokenExchange(String),

    #[error("Invalid response format from 42 API")]
    InvalidUpstreamShape,

    #[error("Attendee list too large to export (more than {limit} registrations)")]
    RosterTooLarge { limit: usize },

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCode | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::TokenExchange(_)
            | AppError::InvalidUpstreamShape
            | AppError::RosterTooLarge { .. }
            | AppError::Upstream { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IntraError> for AppError {
    fn from(err: IntraError) -> Self {
        match err {
            IntraError::Unauthorized => AppError::Unauthenticated,
            IntraError::NotFound(what) => AppError::NotFound(what),
            IntraError::RateLimited { retry_after } => AppError::RateLimited { retry_after },
            IntraError::InvalidResponseShape => AppError::InvalidUpstreamShape,
            IntraError::RosterTooLarge { limit, .. } => AppError::RosterTooLarge { limit },
            IntraError::TokenExchange(body) => AppError::TokenExchange(body),
            IntraError::Upstream { status, message } => AppError::Upstream { status, message },
            IntraError::Decode(msg) => AppError::Internal(anyhow::anyhow!(
                "Failed to decode 42 API response: {}",
                msg
            )),
            IntraError::Transport(msg) => AppError::Internal(anyhow::anyhow!(
                "42 API request failed: {}",
                msg
            )),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error = match &self {
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            AppError::Upstream { status, message } => {
                tracing::error!(upstream_status = status, error = %message, "42 API error");
                message.clone()
            }
            AppError::TokenExchange(msg) => {
                tracing::error!(error = %msg, "Token exchange failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { error })).into_response();

        if let AppError::RateLimited {
            retry_after: Some(secs),
        } = self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
