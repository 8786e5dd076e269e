// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Morpheus Auth Server - authentication and account service
//!
//! This crate owns the trust boundary of the Morpheus project management
//! backend: bearer-token verification, admin authorization, token issuance
//! at login, and the user account endpoints behind them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token verification, admin gate, password hashing
//! - `config` - Environment configuration (fails closed without a secret)
//! - `store` - In-memory user accounts

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;
