// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only account management.
//!
//! Every handler takes [`AdminOnly`]; the router additionally wraps these
//! routes in `require_admin`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::{SecondsFormat, Utc};
use tracing::warn;

use super::users::json_body;
use crate::{
    auth::AdminOnly,
    error::{ApiError, ApiResponse},
    models::{AdminUserItem, AdminUserListResponse, SuspendRequest, SuspendResponse},
    state::AppState,
};

/// Upper bound on a single suspension.
const MAX_SUSPENSION_DAYS: i64 = 36_500;

fn target_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
}

/// List every non-admin account, newest first.
#[utoipa::path(
    get,
    path = "/api/user/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = AdminUserListResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Not authorized (admin required)", body = crate::error::ErrorEnvelope)
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Json<ApiResponse<AdminUserListResponse>> {
    let users = state
        .users
        .read()
        .await
        .list_members()
        .iter()
        .map(AdminUserItem::from)
        .collect();
    Json(ApiResponse::data(AdminUserListResponse { users }))
}

/// Suspend an account for a number of days.
#[utoipa::path(
    post,
    path = "/api/user/admin/{user_id}/suspend",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "Account to suspend")),
    request_body = SuspendRequest,
    responses(
        (status = 200, description = "Account suspended", body = SuspendResponse),
        (status = 400, description = "Self-suspension or invalid duration", body = crate::error::ErrorEnvelope),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Not authorized (admin required)", body = crate::error::ErrorEnvelope),
        (status = 404, description = "No such account", body = crate::error::ErrorEnvelope)
    )
)]
pub async fn suspend_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SuspendRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SuspendResponse>>, ApiError> {
    let user_id = target_id(path)?;

    let mut users = state.users.write().await;
    if users.get(user_id).is_none() {
        return Err(ApiError::user_not_found());
    }
    if user_id == admin.user_id {
        return Err(ApiError::invalid_request("You cannot suspend your own account"));
    }
    let request = json_body(payload)?;
    let days = match request.days {
        Some(days) if (1..=MAX_SUSPENSION_DAYS).contains(&days) => days,
        _ => {
            return Err(ApiError::validation(format!(
                "days must be between 1 and {MAX_SUSPENSION_DAYS}"
            )))
        }
    };

    let user = users.suspend(user_id, days, request.reason, Utc::now())?;
    let ends_at = user
        .suspension
        .as_ref()
        .map(|s| s.ends_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();

    warn!(admin_id = admin.user_id, user_id, days, "account suspended");

    Ok(Json(
        ApiResponse::data(SuspendResponse {
            suspension_end_date: ends_at,
        })
        .with_message(format!(
            "User {} ({}) suspended for {days} days",
            user.nickname, user.email
        )),
    ))
}

/// Lift an account suspension.
#[utoipa::path(
    post,
    path = "/api/user/admin/{user_id}/unsuspend",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "Account to reinstate")),
    responses(
        (status = 200, description = "Suspension lifted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Not authorized (admin required)", body = crate::error::ErrorEnvelope),
        (status = 404, description = "No such account", body = crate::error::ErrorEnvelope)
    )
)]
pub async fn unsuspend_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id = target_id(path)?;
    let user = state.users.write().await.unsuspend(user_id)?;

    warn!(admin_id = admin.user_id, user_id, "account suspension lifted");

    Ok(Json(ApiResponse::message(format!(
        "Suspension of {} ({}) lifted",
        user.nickname, user.email
    ))))
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/user/admin/{user_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "Account to delete")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Self-deletion", body = crate::error::ErrorEnvelope),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorEnvelope),
        (status = 403, description = "Not authorized (admin required)", body = crate::error::ErrorEnvelope),
        (status = 404, description = "No such account", body = crate::error::ErrorEnvelope)
    )
)]
pub async fn delete_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user_id = target_id(path)?;

    let mut users = state.users.write().await;
    if users.get(user_id).is_none() {
        return Err(ApiError::user_not_found());
    }
    if user_id == admin.user_id {
        return Err(ApiError::invalid_request("You cannot delete your own account"));
    }
    let user = users.delete(user_id)?;

    warn!(admin_id = admin.user_id, user_id, "account deleted");

    Ok(Json(ApiResponse::message(format!(
        "Account of {} ({}) deleted",
        user.nickname, user.email
    ))))
}
