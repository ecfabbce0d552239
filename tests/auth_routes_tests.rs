// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth route tests.
//!
//! These tests verify that:
//! 1. Login redirects to the 42 authorization page
//! 2. Code exchange sets the session cookie with the token's lifetime
//! 3. Missing codes and failed exchanges are reported without a session
//! 4. `/auth/me` requires the cookie and surfaces upstream rate limits

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn find_session_cookie(headers: &[String]) -> String {
    headers
        .iter()
        .find(|value| value.starts_with("42_access_token="))
        .cloned()
        .unwrap_or_else(|| panic!("missing session Set-Cookie header: {headers:?}"))
}

async fn mock_token_endpoint(server: &MockServer, code: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(common::token_json("tok", 3600))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The provided authorization grant is invalid"
        }))
    };

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains(format!("code={}", code)))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_redirects_to_authorize_url() {
    let server = MockServer::start().await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!(
        "{}/oauth/authorize?client_id=test_client_id&",
        server.uri()
    )));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("scope=public"));
}

#[tokio::test]
async fn test_process_sets_session_cookie() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server, "abc123", 200).await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/process")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"code":"abc123"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = find_session_cookie(&common::set_cookie_headers(&response));
    assert!(cookie.starts_with("42_access_token=tok"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));

    assert_eq!(common::body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn test_process_secure_cookie_in_production() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server, "abc123", 200).await;
    let config = campus_events::config::Config {
        production: true,
        ..common::test_config(&server.uri())
    };
    let (app, _) = common::create_test_app(config);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/process")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"code":"abc123"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = find_session_cookie(&common::set_cookie_headers(&response));
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_process_without_code() {
    let server = MockServer::start().await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    for body in [r#"{}"#, r#"{"code":""}"#, "not json"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/process")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(common::set_cookie_headers(&response).is_empty());
        assert_eq!(
            common::body_json(response).await,
            json!({ "error": "Code is required" })
        );
    }
}

#[tokio::test]
async fn test_process_exchange_failure() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server, "stale", 401).await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/process")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"code":"stale"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(common::set_cookie_headers(&response).is_empty());

    let body = common::body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to get access token:"));
    assert!(error.contains("invalid_grant"));
}

#[tokio::test]
async fn test_callback_success_redirects_to_dashboard() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server, "xyz", 200).await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/callback?code=xyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    let cookie = find_session_cookie(&common::set_cookie_headers(&response));
    assert!(cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn test_callback_failures_redirect_with_error() {
    let server = MockServer::start().await;
    mock_token_endpoint(&server, "bad", 400).await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let cases = [
        ("/auth/callback", "/?error=no_code"),
        ("/auth/callback?code=", "/?error=no_code"),
        ("/auth/callback?error=access_denied", "/?error=access_denied"),
        ("/auth/callback?code=bad", "/?error=token_error"),
    ];

    for (uri, expected) in cases {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND, "uri: {uri}");
        assert_eq!(response.headers()[header::LOCATION], expected, "uri: {uri}");
        assert!(common::set_cookie_headers(&response).is_empty());
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let server = MockServer::start().await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .header(header::COOKIE, "42_access_token=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let cookie = find_session_cookie(&common::set_cookie_headers(&response));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_check_reports_cookie_presence() {
    let server = MockServer::start().await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(response).await,
        json!({ "authenticated": false })
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/check")
                .header(header::COOKIE, "42_access_token=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        common::body_json(response).await,
        json!({ "authenticated": true })
    );
}

#[tokio::test]
async fn test_me_without_session() {
    let server = MockServer::start().await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        common::body_json(response).await,
        json!({ "error": "Not authenticated" })
    );
}

#[tokio::test]
async fn test_me_proxies_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/me"))
        .and(header_matcher("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_json(7, "jdoe")))
        .expect(1)
        .mount(&server)
        .await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, "42_access_token=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["login"], "jdoe");
    assert_eq!(body["staff?"], false);
}

#[tokio::test]
async fn test_me_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/me"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, "42_access_token=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "12");
}

#[tokio::test]
async fn test_me_with_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, "42_access_token=revoked")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/me"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    let (app, _) = common::create_test_app(common::test_config(&server.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, "42_access_token=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::body_json(response).await,
        json!({ "error": "maintenance" })
    );
}
