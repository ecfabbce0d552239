// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Campus Events: browse upcoming campus events from the 42 intranet API
//!
//! This crate provides the backend for the events dashboard: OAuth login
//! against the 42 API, cookie sessions, passthrough reads of events and
//! attendee lists, and the dashboard view logic (search, pagination, CSV).

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use services::{IntraClient, OAuthClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub oauth: OAuthClient,
    pub intra: IntraClient,
}

impl AppState {
    /// Build the state and its upstream clients from configuration.
    ///
    /// Both clients share one connection pool.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let oauth = OAuthClient::new(http.clone(), &config);
        let intra = IntraClient::new(http, &config.api_base_url);
        Self {
            config,
            oauth,
            intra,
        }
    }
}
