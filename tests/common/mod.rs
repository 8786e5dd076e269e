// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use morpheus_auth_server::{
    api::router,
    auth::{password::hash_password, TokenClaims, TokenService},
    config::{AuthSettings, SigningSecret},
    state::AppState,
    store::{NewUser, UserStore},
};

pub const SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@morpheus.io";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub fn token_service(secret: &str) -> TokenService {
    TokenService::new(&AuthSettings::new(SigningSecret::new(secret).unwrap()))
}

/// Store holding one admin account (id 1).
pub fn admin_store() -> UserStore {
    let mut store = UserStore::new();
    store
        .insert(
            NewUser {
                email: ADMIN_EMAIL.to_string(),
                password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
                nickname: "admin".to_string(),
                region: None,
                is_admin: true,
            },
            Utc::now(),
        )
        .unwrap();
    store
}

pub fn app_with_store(store: UserStore) -> (Router, TokenService) {
    let state = AppState::new(token_service(SECRET), "test").with_store(store);
    (router(state), token_service(SECRET))
}

/// Router over [`admin_store`].
pub fn app() -> (Router, TokenService) {
    app_with_store(admin_store())
}

pub fn claims(user_id: i64, is_admin: bool) -> TokenClaims {
    let now = Utc::now().timestamp();
    TokenClaims {
        user_id,
        email: None,
        nickname: None,
        profile_image: None,
        is_admin,
        iat: now,
        exp: now + 3600,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
