// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the `/api/user` endpoints. Field names are
//! camelCase on the wire, matching what the web client sends and reads.
//!
//! Request fields are all optional so that absent values surface as a
//! `MISSING_FIELDS` envelope rather than a deserialization rejection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::UserRecord;

fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /api/user/me`. `newPassword` requires the current `password`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New nickname
    pub name: Option<String>,
    pub email: Option<String>,
    pub region: Option<String>,
    /// Current password, checked only when changing it
    pub password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DuplicateQuery {
    /// Email address to check
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SuspendRequest {
    /// Suspension length in days (at least 1)
    pub days: Option<i64>,
    pub reason: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
}

/// Public view of an account, embedded in the login response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_image: String,
    pub is_admin: bool,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image: user.profile_image.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DuplicateResponse {
    pub available: bool,
}

/// Response for GET /api/user/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    /// Same as `nickname`; kept for older clients
    pub name: String,
    pub region: Option<String>,
    pub profile_image: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            name: user.nickname.clone(),
            region: user.region.clone(),
            profile_image: user.profile_image.clone(),
            is_admin: user.is_admin,
            created_at: rfc3339(user.created_at),
        }
    }
}

/// Response for GET /api/user/info
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_image: String,
    pub created_at: String,
}

impl From<&UserRecord> for UserInfo {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image: user.profile_image.clone(),
            created_at: rfc3339(user.created_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProfile {
    pub name: String,
    pub email: String,
    pub region: Option<String>,
    pub profile_image: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateProfileResponse {
    pub user: UpdatedProfile,
}

impl From<&UserRecord> for UpdateProfileResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            user: UpdatedProfile {
                name: user.nickname.clone(),
                email: user.email.clone(),
                region: user.region.clone(),
                profile_image: user.profile_image.clone(),
            },
        }
    }
}

/// Admin view of an account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub region: Option<String>,
    pub profile_image: String,
    pub is_admin: bool,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub suspension_start_date: Option<String>,
    pub suspension_end_date: Option<String>,
    pub created_at: String,
}

impl From<&UserRecord> for AdminUserItem {
    fn from(user: &UserRecord) -> Self {
        let suspension = user.suspension.as_ref();
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            region: user.region.clone(),
            profile_image: user.profile_image.clone(),
            is_admin: user.is_admin,
            is_suspended: suspension.is_some(),
            suspension_reason: suspension.and_then(|s| s.reason.clone()),
            suspension_start_date: suspension.map(|s| rfc3339(s.started_at)),
            suspension_end_date: suspension.map(|s| rfc3339(s.ends_at)),
            created_at: rfc3339(user.created_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserListResponse {
    pub users: Vec<AdminUserItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuspendResponse {
    pub suspension_end_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Suspension;

    fn record() -> UserRecord {
        UserRecord {
            id: 3,
            email: "kim@morpheus.io".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            nickname: "kim".to_string(),
            region: Some("Seoul".to_string()),
            profile_image: "basic.png".to_string(),
            is_admin: false,
            suspension: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_never_exposes_password_hash() {
        let json = serde_json::to_string(&UserProfile::from(&record())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains(r#""profileImage":"basic.png""#));
        assert!(json.contains(r#""name":"kim""#));
    }

    #[test]
    fn admin_item_reflects_suspension() {
        let mut user = record();
        let item = AdminUserItem::from(&user);
        assert!(!item.is_suspended);
        assert!(item.suspension_end_date.is_none());

        let now = Utc::now();
        user.suspension = Some(Suspension {
            reason: Some("spam".to_string()),
            started_at: now,
            ends_at: now + chrono::Duration::days(2),
        });
        let item = AdminUserItem::from(&user);
        assert!(item.is_suspended);
        assert_eq!(item.suspension_reason.as_deref(), Some("spam"));
        assert!(item.suspension_end_date.is_some());
    }

    #[test]
    fn update_request_reads_camel_case_new_password() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"kim","email":"a@b.io","newPassword":"next"}"#)
                .unwrap();
        assert_eq!(req.new_password.as_deref(), Some("next"));
        assert!(req.password.is_none());
    }

    #[test]
    fn missing_request_fields_deserialize_as_none() {
        let req: SignupRequest = serde_json::from_str(r#"{"email":"a@b.io"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.io"));
        assert!(req.password.is_none());
        assert!(req.nickname.is_none());
    }
}
