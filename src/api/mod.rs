// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_admin, require_auth},
    error::{ApiError, ErrorDetail, ErrorEnvelope},
    models::{
        AdminUserItem, AdminUserListResponse, DuplicateResponse, LoginRequest, LoginResponse,
        SignupRequest, SignupResponse, SuspendRequest, SuspendResponse, UpdateProfileRequest,
        UpdateProfileResponse, UpdatedProfile, UserInfo, UserProfile, UserSummary,
    },
    state::AppState,
};

pub mod admin;
pub mod health;
pub mod users;

/// `/api/user` routes, grouped by gate.
fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signup", post(users::signup))
        .route("/join", post(users::signup))
        .route("/login", post(users::login))
        .route("/duplicate", get(users::check_duplicate));

    let member = Router::new()
        .route("/logout", post(users::logout))
        .route("/info", get(users::get_info))
        .route(
            "/me",
            get(users::get_current_user)
                .put(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/users", get(admin::list_users))
        .route("/admin/{user_id}/suspend", post(admin::suspend_user))
        .route("/admin/{user_id}/unsuspend", post(admin::unsuspend_user))
        .route("/admin/{user_id}", delete(admin::delete_user))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    public.merge(member).merge(admin)
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .nest("/api/user", user_routes(&state))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// CORS for the browser client: one origin, credentials allowed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::index,
        health::health,
        users::signup,
        users::login,
        users::logout,
        users::check_duplicate,
        users::get_current_user,
        users::get_info,
        users::update_current_user,
        users::delete_current_user,
        admin::list_users,
        admin::suspend_user,
        admin::unsuspend_user,
        admin::delete_user
    ),
    components(
        schemas(
            ErrorEnvelope,
            ErrorDetail,
            SignupRequest,
            SignupResponse,
            LoginRequest,
            LoginResponse,
            UserSummary,
            UserProfile,
            UserInfo,
            UpdateProfileRequest,
            UpdateProfileResponse,
            UpdatedProfile,
            DuplicateResponse,
            AdminUserItem,
            AdminUserListResponse,
            SuspendRequest,
            SuspendResponse,
            health::IndexResponse,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Signup, login and the caller's own account"),
        (name = "Admin", description = "Account management (admin token required)")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::config::{AuthSettings, SigningSecret};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let settings = AuthSettings::new(SigningSecret::new("router-test-secret").unwrap());
        AppState::new(TokenService::new(&settings), "test")
    }

    async fn fetch(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_serves_banner() {
        let (status, body) = fetch("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Morpheus Auth API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn wrong_method_gets_envelope() {
        let (status, body) = fetch("/api/user/login").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn malformed_query_gets_envelope() {
        let (status, body) = fetch("/api/user/duplicate?email=a@b.io&email=c@d.io").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/user/login"));
    }

    #[test]
    fn cors_layer_rejects_invalid_origin() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
