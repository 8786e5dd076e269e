// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input validation for account fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

const MAX_FIELD_LEN: usize = 255;

/// The pattern is a fixed literal that compiles.
#[allow(clippy::unwrap_used)]
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    &EMAIL_REGEX
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if !email_regex().is_match(email) {
        return Err(ApiError::validation("Email format is invalid"));
    }
    if email.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::validation("Email must be at most 255 characters"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    if password.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::validation("Password must be at most 255 characters"));
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), ApiError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Nickname is required"));
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::validation("Nickname must be at most 255 characters"));
    }
    Ok(())
}
