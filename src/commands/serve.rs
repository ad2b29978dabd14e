// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::gate::{AccessGate, DEFAULT_TRUSTED_REFERER, RunMode};
use crate::server::{AppState, build_router};
use crate::sheets::SheetsClient;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn handle(settings: Settings, m: &clap::ArgMatches) -> Result<()> {
    let bind = m
        .get_one::<String>("bind")
        .map(String::as_str)
        .unwrap_or("127.0.0.1:3000");
    let mode = m.get_one::<RunMode>("mode").copied().unwrap_or_default();
    let trusted = m
        .get_one::<String>("trusted-referer")
        .map(String::as_str)
        .unwrap_or(DEFAULT_TRUSTED_REFERER);

    if mode == RunMode::Development {
        warn!("development mode: referer gate disabled, do not expose this instance");
    }
    let missing = settings.missing_for_rows();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Google Sheets settings incomplete, dashboard will be empty"
        );
    }

    let client = SheetsClient::new(settings).context("Build Google Sheets client")?;
    let app = build_router(AppState::new(client, AccessGate::new(trusted, mode)));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Bind {}", bind))?;
    info!(addr = %listener.local_addr()?, ?mode, "pettycash listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
