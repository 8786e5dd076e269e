// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance and verification.
//!
//! A token is valid iff its signature verifies against the configured secret
//! and its `exp` has not passed. There is no revocation list and no session
//! store; logout is the client discarding the token.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::error::{AuthError, TokenRejection};
use crate::config::AuthSettings;
use crate::store::UserRecord;

/// Signs and verifies bearer tokens with one shared secret.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.secret.expose_secret();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = settings.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: settings.token_ttl,
        }
    }

    /// Lifetime given to newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid from `now` for the configured TTL.
    pub fn issue(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| AuthError::Issuance("token lifetime out of range".to_string()))?;
        let claims = TokenClaims {
            user_id: user.id,
            email: Some(user.email.clone()),
            nickname: Some(user.nickname.clone()),
            profile_image: Some(user.profile_image.clone()),
            is_admin: user.is_admin,
            iat,
            exp,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Issuance(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                    _ => TokenRejection::Malformed,
                };
                AuthError::InvalidToken(reason)
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("leeway", &self.validation.leeway)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
