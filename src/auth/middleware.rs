// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Route-subtree counterparts of the `Auth` / `AdminOnly` extractors. On
//! success the identity is inserted into the request extensions, where the
//! extractors pick it up without verifying the token a second time.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::{authorize_admin, resolve_identity};
use crate::state::AppState;

/// Reject requests without a valid bearer token.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match resolve_identity(request.headers(), request.extensions(), &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Reject requests that are not authenticated as an admin.
pub async fn require_admin(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let authenticated = resolve_identity(request.headers(), request.extensions(), &state.tokens);
    match authorize_admin(authenticated) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
