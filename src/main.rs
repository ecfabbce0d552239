// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Campus Events API Server
//!
//! Serves the events dashboard backend: 42 OAuth login, cookie sessions and
//! read-only access to campus events and attendee lists.

use campus_events::{
    config::{Config, ParticipantsAccess},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        api = %config.api_base_url,
        participants_access = ?config.participants_access,
        admins = config.admin_logins.len(),
        production = config.production,
        "Starting Campus Events API"
    );

    if config.participants_access == ParticipantsAccess::Admin && config.admin_logins.is_empty() {
        tracing::warn!("ADMIN_LOGINS is empty, nobody can read attendee lists under the admin policy");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone()));

    // Build router
    let app = campus_events::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("campus_events=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
