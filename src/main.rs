// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use chrono::Utc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use morpheus_auth_server::{
    api::{cors_layer, router},
    auth::{password::hash_password, TokenService},
    config::{AdminSeed, AppConfig},
    logging::init_tracing,
    state::AppState,
    store::{NewUser, UserStore},
};

fn seeded_store(seed: Option<&AdminSeed>) -> Result<UserStore, String> {
    let mut store = UserStore::new();
    if let Some(seed) = seed {
        let password_hash = hash_password(&seed.password).map_err(|e| e.to_string())?;
        let admin = store
            .insert(
                NewUser {
                    email: seed.email.clone(),
                    password_hash,
                    nickname: "admin".to_string(),
                    region: None,
                    is_admin: true,
                },
                Utc::now(),
            )
            .map_err(|e| e.message)?;
        info!(user_id = admin.id, "seeded admin account");
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Tracing is not up yet; configuration errors go straight to stderr.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    let store = match seeded_store(config.admin_seed.as_ref()) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to seed admin account");
            return ExitCode::FAILURE;
        }
    };

    let cors = match cors_layer(&config.cors_origin) {
        Ok(cors) => cors,
        Err(e) => {
            error!(origin = %config.cors_origin, error = %e, "invalid CORS origin");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(TokenService::new(&config.auth), config.environment.as_str())
        .with_store(store);
    let app = router(state).layer(cors);

    let addr = config.bind_address();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
            shutdown.cancel();
        }
    });

    info!(%addr, environment = %config.environment, "Morpheus auth server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    info!("server stopped");
    ExitCode::SUCCESS
}
