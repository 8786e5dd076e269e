// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token authentication and the axum extractors built on it.
//!
//! [`authenticate`] and [`authorize_admin`] are the only places a token is
//! checked. The extractors here and the layers in `middleware.rs` call them.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, TokenService};
use crate::state::AppState;

/// Pull the credential out of `Authorization: Bearer <token>`.
///
/// The header is split on whitespace; the first segment must be the
/// `Bearer` scheme (any case) and the second is the token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let mut segments = value.split_whitespace();
    match (segments.next(), segments.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}

/// Authenticate a request from its headers.
///
/// Missing or malformed header is `NO_TOKEN`; any verification failure is
/// `INVALID_TOKEN`.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token)?;
    Ok(AuthenticatedUser::from_claims(claims))
}

/// Gate an authentication result on the admin flag.
///
/// A failed authentication becomes `UNAUTHORIZED` without looking at the
/// identity; a non-admin identity is `FORBIDDEN`.
pub fn authorize_admin(
    authenticated: Result<AuthenticatedUser, AuthError>,
) -> Result<AuthenticatedUser, AuthError> {
    let user = authenticated.map_err(|e| AuthError::Unauthorized(Box::new(e)))?;
    if !user.is_admin {
        return Err(AuthError::Forbidden);
    }
    Ok(user)
}

/// Identity already attached by middleware, or a fresh authentication.
pub(crate) fn resolve_identity(
    headers: &HeaderMap,
    extensions: &Extensions,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    if let Some(user) = extensions.get::<AuthenticatedUser>() {
        return Ok(user.clone());
    }
    authenticate(headers, tokens)
}

/// Extractor for authenticated users.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(Auth(user): Auth) -> Json<AuthenticatedUser> {
///     Json(user)
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = resolve_identity(&parts.headers, &parts.extensions, &state.tokens)?;
        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Extractor that requires the admin flag.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authenticated = Auth::from_request_parts(parts, state)
            .await
            .map(|Auth(user)| user);
        authorize_admin(authenticated).map(AdminOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenClaims, TokenRejection};
    use crate::config::{AuthSettings, SigningSecret};
    use axum::http::{HeaderValue, Request};
    use chrono::Utc;

    const SECRET: &str = "extractor-test-secret";

    fn create_test_state() -> AppState {
        let settings = AuthSettings::new(SigningSecret::new(SECRET).unwrap());
        AppState::new(TokenService::new(&settings), "test")
    }

    fn signed_token(state: &AppState, user_id: i64, is_admin: bool) -> String {
        let now = Utc::now().timestamp();
        state
            .tokens
            .sign(&TokenClaims {
                user_id,
                email: None,
                nickname: None,
                profile_image: None,
                is_admin,
                iat: now,
                exp: now + 3600,
            })
            .unwrap()
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_requires_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));
    }

    #[test]
    fn bearer_token_requires_token_segment() {
        for value in ["Bearer", "Bearer   ", "", "Basic abc", "abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken), "{value:?}");
        }
    }

    #[test]
    fn bearer_token_accepts_any_scheme_case_and_spacing() {
        for value in ["Bearer abc.def.ghi", "bearer abc.def.ghi", "BEARER   abc.def.ghi"] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
        }
    }

    #[test]
    fn authorize_admin_wraps_authentication_failure() {
        let result = authorize_admin(Err(AuthError::InvalidToken(TokenRejection::Expired)));
        assert_eq!(
            result,
            Err(AuthError::Unauthorized(Box::new(AuthError::InvalidToken(
                TokenRejection::Expired
            ))))
        );
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = create_test_state();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_jwt() {
        let state = create_test_state();
        let token = signed_token(&state, 42, false);
        let mut parts = parts_with_header(Some(format!("Bearer {token}").as_str()));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(parts.extensions.get::<AuthenticatedUser>(), Some(&user));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = create_test_state();
        let mut parts = parts_with_header(None);

        let user = AuthenticatedUser {
            user_id: 7,
            email: None,
            nickname: Some("from-middleware".to_string()),
            profile_image: None,
            is_admin: true,
            issued_at: 0,
            expires_at: 0,
        };
        parts.extensions.insert(user.clone());

        let Auth(found) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let state = create_test_state();
        let token = signed_token(&state, 42, false);
        let mut parts = parts_with_header(Some(format!("Bearer {token}").as_str()));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let state = create_test_state();
        let token = signed_token(&state, 42, true);
        let mut parts = parts_with_header(Some(format!("Bearer {token}").as_str()));

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &state).await.unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn admin_only_reports_unauthorized_without_token() {
        let state = create_test_state();
        let mut parts = parts_with_header(None);

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }
}
