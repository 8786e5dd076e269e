// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorEnvelope;

/// Why a presented token failed verification.
///
/// Clients only ever see `INVALID_TOKEN`; the distinction is kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Signature does not match the configured secret
    BadSignature,
    /// `exp` is in the past
    Expired,
    /// Not a decodable HS256 token with the expected claims
    Malformed,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::BadSignature => "bad_signature",
            TokenRejection::Expired => "expired",
            TokenRejection::Malformed => "malformed",
        }
    }
}

/// Authentication and authorization failures.
///
/// `MissingToken` and `Unauthorized` are 401 ("log in again"), while
/// `InvalidToken` and `Forbidden` are 403.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header
    #[error("Authorization token is missing")]
    MissingToken,

    /// Signature mismatch, expiry, or undecodable token
    #[error("Token is invalid or expired")]
    InvalidToken(TokenRejection),

    /// Authentication failed on an admin-gated route
    #[error("Authentication is required")]
    Unauthorized(#[source] Box<AuthError>),

    /// Authenticated, but without the admin flag
    #[error("Administrator privileges are required")]
    Forbidden,

    /// Token could not be signed
    #[error("Failed to issue token: {0}")]
    Issuance(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "NO_TOKEN",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::Unauthorized(_) => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Issuance(_) => "SERVER_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Issuance(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken(reason) => {
                tracing::debug!(code = self.error_code(), reason = reason.as_str(), "request rejected");
            }
            AuthError::Unauthorized(inner) => {
                tracing::debug!(code = self.error_code(), cause = inner.error_code(), "request rejected");
            }
            AuthError::Issuance(msg) => {
                tracing::error!(error = %msg, "token issuance failed");
            }
            _ => tracing::debug!(code = self.error_code(), "request rejected"),
        }

        let status = self.status_code();
        let body = Json(ErrorEnvelope::new(self.error_code(), self.to_string()));
        (status, body).into_response()
    }
}
