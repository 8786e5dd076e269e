// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    /// Verifier/issuer shared by every request. Read-only.
    pub tokens: Arc<TokenService>,
    pub users: Arc<RwLock<UserStore>>,
    /// Environment name reported by `/health`.
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(tokens: TokenService, environment: impl Into<Arc<str>>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            users: Arc::new(RwLock::new(UserStore::new())),
            environment: environment.into(),
        }
    }

    pub fn with_store(mut self, store: UserStore) -> Self {
        self.users = Arc::new(RwLock::new(store));
        self
    }
}
