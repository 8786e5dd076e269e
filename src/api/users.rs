// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: signup, login, logout, duplicate check, and the caller's
//! own account.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::{
    auth::{
        password::{hash_password, verify_password_or_dummy},
        Auth,
    },
    error::{ApiError, ApiResponse},
    models::{
        DuplicateQuery, DuplicateResponse, LoginRequest, LoginResponse, SignupRequest,
        SignupResponse, UpdateProfileRequest, UpdateProfileResponse, UserInfo, UserProfile,
        UserSummary,
    },
    state::AppState,
    store::{NewUser, ProfileUpdate},
    validation::{validate_email, validate_nickname, validate_password},
};

/// Unwrap a JSON body, turning a rejection into the standard envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn hash_off_thread(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal("Server error")
        })
}

async fn verify_off_thread(hash: Option<String>, password: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password_or_dummy(hash.as_deref(), &password))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {e}")))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/user/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Missing fields, invalid input, or email taken", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponse>>), ApiError> {
    let request = json_body(payload)?;
    let (Some(email), Some(password), Some(nickname)) = (
        non_empty(request.email),
        non_empty(request.password),
        non_empty(request.nickname),
    ) else {
        return Err(ApiError::missing_fields(
            "Email, password and nickname are required",
        ));
    };

    validate_email(&email)?;
    validate_password(&password)?;
    validate_nickname(&nickname)?;

    if state.users.read().await.email_exists(&email) {
        return Err(ApiError::email_exists());
    }

    let password_hash = hash_off_thread(password).await?;
    let user = state.users.write().await.insert(
        NewUser {
            email,
            password_hash,
            nickname: nickname.trim().to_string(),
            region: non_empty(request.region),
            is_admin: false,
        },
        Utc::now(),
    )?;

    info!(user_id = user.id, "account created");

    let body = ApiResponse::data(SignupResponse {
        id: user.id,
        email: user.email,
        nickname: user.nickname,
    })
    .with_message("Signup complete");
    Ok((StatusCode::CREATED, Json(body)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Account suspended", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let request = json_body(payload)?;
    let (Some(email), Some(password)) = (non_empty(request.email), non_empty(request.password))
    else {
        return Err(ApiError::missing_fields("Email and password are required"));
    };

    let user = state.users.read().await.find_by_email(&email).cloned();

    // Unknown emails still pay for one Argon2 verification.
    let hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_off_thread(hash, password).await?;
    let user = match user {
        Some(user) if verified => user,
        _ => return Err(ApiError::invalid_credentials()),
    };

    let now = Utc::now();
    if let Some(suspension) = &user.suspension {
        if suspension.is_active(now) {
            info!(user_id = user.id, "login refused for suspended account");
            return Err(ApiError::account_suspended(
                suspension.remaining_days(now),
                suspension.reason.clone().unwrap_or_default(),
                suspension.ends_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        if state.users.write().await.lift_expired_suspension(user.id, now) {
            info!(user_id = user.id, "expired suspension lifted");
        }
    }

    let token = state.tokens.issue(&user, now)?;
    info!(user_id = user.id, is_admin = user.is_admin, "token issued");

    Ok(Json(
        ApiResponse::data(LoginResponse {
            token,
            user: UserSummary::from(&user),
        })
        .with_message("Login successful"),
    ))
}

/// Log out. Tokens are stateless, so this only confirms the caller's token
/// was valid; the client discards it.
#[utoipa::path(
    post,
    path = "/api/user/logout",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Missing token", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn logout(Auth(user): Auth) -> Json<ApiResponse<()>> {
    info!(user_id = user.user_id, "logout");
    Json(ApiResponse::message("Logged out"))
}

/// Check whether an email address is still free.
#[utoipa::path(
    get,
    path = "/api/user/duplicate",
    tag = "Users",
    params(DuplicateQuery),
    responses(
        (status = 200, description = "Availability", body = DuplicateResponse),
        (status = 400, description = "Missing email or malformed query", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn check_duplicate(
    State(state): State<AppState>,
    query: Result<Query<DuplicateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DuplicateResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
    let email = non_empty(query.email).ok_or_else(|| ApiError::missing_fields("Email is required"))?;
    let available = !state.users.read().await.email_exists(&email);
    Ok(Json(ApiResponse::data(DuplicateResponse { available })))
}

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Missing token", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let users = state.users.read().await;
    let record = users.get(user.user_id).ok_or_else(ApiError::user_not_found)?;
    Ok(Json(ApiResponse::data(UserProfile::from(record))))
}

/// Short account summary of the caller.
#[utoipa::path(
    get,
    path = "/api/user/info",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account summary", body = UserInfo),
        (status = 401, description = "Missing token", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn get_info(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let users = state.users.read().await;
    let record = users.get(user.user_id).ok_or_else(ApiError::user_not_found)?;
    Ok(Json(ApiResponse::data(UserInfo::from(record))))
}

/// Update the caller's profile, optionally changing the password.
///
/// Tokens already issued keep the old email and nickname until they expire.
#[utoipa::path(
    put,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Missing fields, invalid input, or email taken", body = crate::error::ErrorEnvelope),
        (status = 401, description = "Missing token or wrong current password", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn update_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UpdateProfileResponse>>, ApiError> {
    let request = json_body(payload)?;
    let (Some(nickname), Some(email)) = (non_empty(request.name), non_empty(request.email)) else {
        return Err(ApiError::missing_fields("Name and email are required"));
    };
    validate_email(&email)?;
    validate_nickname(&nickname)?;

    let current_hash = state
        .users
        .read()
        .await
        .get(user.user_id)
        .map(|record| record.password_hash.clone())
        .ok_or_else(ApiError::user_not_found)?;

    let password_hash = match non_empty(request.new_password) {
        Some(new_password) => {
            let current = non_empty(request.password)
                .ok_or_else(|| ApiError::missing_fields("Current password is required"))?;
            if !verify_off_thread(Some(current_hash), current).await? {
                return Err(ApiError::invalid_password());
            }
            validate_password(&new_password)?;
            Some(hash_off_thread(new_password).await?)
        }
        None => None,
    };
    let password_changed = password_hash.is_some();

    let updated = state.users.write().await.update(
        user.user_id,
        ProfileUpdate {
            email,
            nickname: nickname.trim().to_string(),
            region: non_empty(request.region),
            password_hash,
        },
    )?;

    info!(user_id = updated.id, password_changed, "profile updated");

    Ok(Json(
        ApiResponse::data(UpdateProfileResponse::from(&updated)).with_message("Profile updated"),
    ))
}

/// Delete the caller's own account.
#[utoipa::path(
    delete,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing token", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Invalid or expired token", body = crate::error::ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorEnvelope),
    )
)]
pub async fn delete_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state.users.write().await.delete(user.user_id)?;
    info!(user_id = deleted.id, "account closed by owner");
    Ok(Json(ApiResponse::message("Account deleted")))
}
