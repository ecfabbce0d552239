// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 token exchange against the 42 identity provider.

use crate::config::Config;
use crate::models::Token;
use crate::services::intra::IntraError;

/// Scope requested at login; read-only access is all the dashboard needs.
const OAUTH_SCOPE: &str = "public";

/// Token endpoint client for the authorization-code and client-credentials
/// grants.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// URL the browser is sent to for login.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            OAUTH_SCOPE
        )
    }

    /// Exchange an authorization code for a user token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, IntraError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Get an application token for anonymous reads.
    pub async fn client_credentials_token(&self) -> Result<Token, IntraError> {
        self.request_token(&[
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, IntraError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(form)
            .send()
            .await
            .map_err(|e| IntraError::Transport(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "42 token exchange failed");
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(IntraError::TokenExchange(message));
        }

        response
            .json()
            .await
            .map_err(|e| IntraError::Decode(format!("Failed to parse token response: {}", e)))
    }
}
