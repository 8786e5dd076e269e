// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token gate and admin gate, exercised through the router.

mod common;

use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use common::{app, bearer, claims, error_code, send, token_service};

#[tokio::test]
async fn missing_header_is_no_token_envelope() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/user/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": {"code": "NO_TOKEN", "message": "Authorization token is missing"}
        })
    );
}

#[tokio::test]
async fn malformed_header_is_no_token() {
    let (app, _) = app();
    for header in ["Bearer", "Bearer ", "Basic abc123", "token-without-scheme", ""] {
        let (status, body) = send(&app, Method::GET, "/api/user/me", Some(header), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {header:?}");
        assert_eq!(error_code(&body), "NO_TOKEN", "header {header:?}");
    }
}

#[tokio::test]
async fn scheme_is_case_insensitive() {
    let (app, tokens) = app();
    let token = tokens.sign(&claims(1, true)).unwrap();
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/user/me",
        Some(format!("bearer {token}").as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn token_signed_with_other_key_is_invalid() {
    let (app, _) = app();
    let token = token_service("some-other-secret")
        .sign(&claims(1, true))
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn expired_token_is_invalid() {
    let (app, tokens) = app();
    let mut expired = claims(1, true);
    expired.iat -= 7200;
    expired.exp = Utc::now().timestamp() - 60;
    let token = tokens.sign(&expired).unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/user/me",
        Some("Bearer not.a.jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn token_without_exp_is_invalid() {
    let (app, _) = app();
    let token = encode(
        &Header::default(),
        &json!({"userId": 1, "isAdmin": true}),
        &EncodingKey::from_secret(common::SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn tampered_admin_flag_is_invalid() {
    let (app, tokens) = app();
    let token = tokens.sign(&claims(42, false)).unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut payload: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&parts[1]).unwrap()).unwrap();
    payload["isAdmin"] = json!(true);
    parts[1] = URL_SAFE_NO_PAD.encode(payload.to_string());
    let forged = parts.join(".");

    let (status, body) = send(&app, Method::GET, "/api/user/users", Some(bearer(&forged).as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, body) = send(&app, Method::GET, "/api/user/me", Some(bearer(&forged).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn issued_token_verifies_with_same_claims() {
    let (app, tokens) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({"email": common::ADMIN_EMAIL, "password": common::ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["data"]["token"].as_str().unwrap();
    let verified = tokens.verify(token).unwrap();
    assert_eq!(verified.user_id, 1);
    assert!(verified.is_admin);
    assert_eq!(verified.email.as_deref(), Some(common::ADMIN_EMAIL));
    assert_eq!(verified.exp - verified.iat, 24 * 3600);
}

#[tokio::test]
async fn admin_route_wraps_authentication_failures() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/user/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let wrong_key = token_service("some-other-secret")
        .sign(&claims(1, true))
        .unwrap();
    let (status, body) = send(&app, Method::GET, "/api/user/users", Some(bearer(&wrong_key).as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_route_forbids_non_admin() {
    let (app, tokens) = app();
    let token = tokens.sign(&claims(42, false)).unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/users", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn absent_admin_flag_is_forbidden() {
    let (app, _) = app();
    let exp = Utc::now().timestamp() + 3600;
    let token = encode(
        &Header::default(),
        &json!({"userId": 42, "exp": exp}),
        &EncodingKey::from_secret(common::SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/users", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn admin_flag_lets_request_through() {
    let (app, tokens) = app();
    let token = tokens.sign(&claims(42, true)).unwrap();

    let (status, body) = send(&app, Method::GET, "/api/user/users", Some(bearer(&token).as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["users"], json!([]));
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("OK"));
    assert_eq!(body["environment"], json!("test"));

    let (status, _) = send(&app, Method::GET, "/api/user/duplicate?email=x@y.io", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found_envelope() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    assert_eq!(body["success"], json!(false));
}
