// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Belonio-Tracker poller
//!
//! Refreshes Belonio gift card metrics on a fixed interval and logs each
//! snapshot as structured JSON.

use anyhow::Context;
use belonio_tracker::{
    config::Config,
    services::{BelonioClient, RefreshCoordinator},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        api_host = %config.api_host,
        username = %config.username,
        "Starting Belonio-Tracker"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("belonio-tracker/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let client = BelonioClient::new(http, config.credentials(), config.client_options());
    let mut coordinator = RefreshCoordinator::new(client, config.refresh_interval);

    coordinator
        .run(shutdown_signal(), |snapshot| {
            tracing::info!(
                count = snapshot.count,
                total_remaining = snapshot.total_remaining,
                most_recent_remaining = snapshot.most_recent_remaining,
                most_recent_original = snapshot.most_recent_original,
                barcode_url = snapshot.barcode_url.as_deref(),
                refreshed_at = %snapshot.refreshed_at,
                "Gift card metrics"
            );
        })
        .await;

    tracing::info!("Belonio-Tracker stopped");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("belonio_tracker=debug,info")),
        )
        .with(format)
        .init();
}
