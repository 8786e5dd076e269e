// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`AppConfig`] loaded once at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `JWT_TTL_HOURS` | Lifetime of issued tokens (1 to 8760) | `24` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance on `exp` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `CORS_ORIGIN` | Allowed browser origin | `http://localhost:5173` |
//! | `APP_ENV` | Environment name reported by `/health` | `development` |
//! | `ADMIN_EMAIL` | Seeded admin account email | Optional |
//! | `ADMIN_PASSWORD` | Seeded admin account password | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! A missing signing secret is fatal. The service never falls back to a
//! built-in key.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_TTL_HOURS_ENV: &str = "JWT_TTL_HOURS";
pub const JWT_LEEWAY_SECS_ENV: &str = "JWT_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const CORS_ORIGIN_ENV: &str = "CORS_ORIGIN";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
/// One year.
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Secret shipped as the fallback by the legacy Express backend. Refused so a
/// copied `.env` cannot silently reintroduce it.
const LEGACY_DEFAULT_SECRET: &str = "secretkey";

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; refusing to start without a signing secret")]
    MissingSecret(&'static str),

    #[error("{0} is empty; refusing to start without a signing secret")]
    EmptySecret(&'static str),

    #[error("{0} uses the well-known default value; configure a private secret")]
    InsecureSecret(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0} is set but {1} is not")]
    IncompleteAdminSeed(&'static str, &'static str),
}

/// HS256 signing secret.
///
/// `Debug` and `Display` never print the key material.
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Validate and wrap a secret value.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::EmptySecret(JWT_SECRET_ENV));
        }
        if value == LEGACY_DEFAULT_SECRET {
            return Err(ConfigError::InsecureSecret(JWT_SECRET_ENV));
        }
        Ok(Self(value.into_bytes()))
    }

    pub fn expose_secret(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidValue {
                name: LOG_FORMAT_ENV,
                value: value.to_string(),
            }),
        }
    }
}

/// Credentials for the admin account created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token verification and issuance settings.
#[derive(Debug)]
pub struct AuthSettings {
    pub secret: SigningSecret,
    pub token_ttl: Duration,
    pub leeway_secs: u64,
}

impl AuthSettings {
    /// Settings with the default TTL and no leeway.
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 3600),
            leeway_secs: 0,
        }
    }
}

/// Full application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub environment: String,
    pub admin_seed: Option<AdminSeed>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::MissingSecret(JWT_SECRET_ENV))?;
        let secret = SigningSecret::new(secret)?;

        let ttl_hours = parse_or(&lookup, JWT_TTL_HOURS_ENV, DEFAULT_TOKEN_TTL_HOURS)?;
        let token_ttl = Some(ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .and_then(|hours| hours.checked_mul(3600))
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: JWT_TTL_HOURS_ENV,
                value: ttl_hours.to_string(),
            })?;
        let leeway_secs = parse_or(&lookup, JWT_LEEWAY_SECS_ENV, 0u64)?;
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;

        let admin_seed = match (lookup(ADMIN_EMAIL_ENV), lookup(ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteAdminSeed(
                    ADMIN_EMAIL_ENV,
                    ADMIN_PASSWORD_ENV,
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteAdminSeed(
                    ADMIN_PASSWORD_ENV,
                    ADMIN_EMAIL_ENV,
                ))
            }
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            auth: AuthSettings {
                secret,
                token_ttl,
                leeway_secs,
            },
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cors_origin: lookup(CORS_ORIGIN_ENV).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            environment: lookup(APP_ENV_ENV).unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            admin_seed,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}
