// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and admin authorization for the Morpheus API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/user/login` issues an HS256 token signed with `JWT_SECRET`
//! 2. The client sends `Authorization: Bearer <token>` on every protected call
//! 3. The server:
//!    - verifies signature and expiry ([`TokenService::verify`])
//!    - attaches the decoded [`AuthenticatedUser`] to the request
//!    - on admin routes, additionally requires `isAdmin`
//!
//! ## Failure Codes
//!
//! | Code | Status | Meaning |
//! |------|--------|---------|
//! | `NO_TOKEN` | 401 | header missing or not `Bearer <token>` |
//! | `INVALID_TOKEN` | 403 | bad signature or expired |
//! | `UNAUTHORIZED` | 401 | admin route, authentication failed |
//! | `FORBIDDEN` | 403 | admin route, caller is not an admin |

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::{AuthError, TokenRejection};
pub use extractor::{authenticate, authorize_admin, bearer_token, AdminOnly, Auth};
pub use middleware::{require_admin, require_auth};
pub use token::TokenService;
