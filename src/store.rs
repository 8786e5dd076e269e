// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user account store.
//!
//! Account ids are allocated sequentially from 1 and never reused. Emails are
//! unique. The store lives behind `AppState`'s `RwLock`; nothing here is
//! async.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::error::ApiError;

pub const DEFAULT_PROFILE_IMAGE: &str = "basic.png";

/// An active or elapsed account suspension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspension {
    pub reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Suspension {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }

    /// Whole days left, rounded up.
    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        let remaining = (self.ends_at - now).num_seconds().max(0);
        (remaining + 86_399) / 86_400
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub nickname: String,
    pub region: Option<String>,
    pub profile_image: String,
    pub is_admin: bool,
    pub suspension: Option<Suspension>,
    pub created_at: DateTime<Utc>,
}

/// Input for [`UserStore::insert`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub region: Option<String>,
    pub is_admin: bool,
}

/// Input for [`UserStore::update`]. `password_hash: None` keeps the current
/// password.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub email: String,
    pub nickname: String,
    pub region: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<i64, UserRecord>,
    next_id: i64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|user| user.email == email)
    }

    pub fn get(&self, id: i64) -> Option<&UserRecord> {
        self.users.get(&id)
    }

    pub fn insert(&mut self, new_user: NewUser, now: DateTime<Utc>) -> Result<UserRecord, ApiError> {
        if self.email_exists(&new_user.email) {
            return Err(ApiError::email_exists());
        }

        self.next_id += 1;
        let user = UserRecord {
            id: self.next_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            nickname: new_user.nickname,
            region: new_user.region,
            profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
            is_admin: new_user.is_admin,
            suspension: None,
            created_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Replace the editable profile fields. The new email must not belong to
    /// another account.
    pub fn update(&mut self, id: i64, update: ProfileUpdate) -> Result<UserRecord, ApiError> {
        if !self.users.contains_key(&id) {
            return Err(ApiError::user_not_found());
        }
        if self
            .users
            .values()
            .any(|user| user.id != id && user.email == update.email)
        {
            return Err(ApiError::email_exists());
        }

        let user = self.users.get_mut(&id).ok_or_else(ApiError::user_not_found)?;
        user.email = update.email;
        user.nickname = update.nickname;
        user.region = update.region;
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        Ok(user.clone())
    }

    /// Non-admin accounts, newest first.
    pub fn list_members(&self) -> Vec<UserRecord> {
        let mut members: Vec<UserRecord> = self
            .users
            .values()
            .filter(|user| !user.is_admin)
            .cloned()
            .collect();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        members
    }

    pub fn suspend(
        &mut self,
        id: i64,
        days: i64,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, ApiError> {
        let user = self.users.get_mut(&id).ok_or_else(ApiError::user_not_found)?;
        user.suspension = Some(Suspension {
            reason,
            started_at: now,
            ends_at: now + Duration::days(days),
        });
        Ok(user.clone())
    }

    pub fn unsuspend(&mut self, id: i64) -> Result<UserRecord, ApiError> {
        let user = self.users.get_mut(&id).ok_or_else(ApiError::user_not_found)?;
        user.suspension = None;
        Ok(user.clone())
    }

    /// Clear a suspension whose end date has passed. Returns whether one was
    /// cleared.
    pub fn lift_expired_suspension(&mut self, id: i64, now: DateTime<Utc>) -> bool {
        match self.users.get_mut(&id) {
            Some(user) if user.suspension.as_ref().is_some_and(|s| !s.is_active(now)) => {
                user.suspension = None;
                true
            }
            _ => false,
        }
    }

    pub fn delete(&mut self, id: i64) -> Result<UserRecord, ApiError> {
        self.users.remove(&id).ok_or_else(ApiError::user_not_found)
    }
}
