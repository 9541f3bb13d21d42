// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use execution_gateway::{
    api,
    blockchain::{BalanceCache, RpcBalanceProvider},
    chains::ChainRegistry,
    config,
    execution::FundsChecker,
    executor::GatewayExecutor,
    relay::RelayClient,
    state::AppState,
};

/// Balance cache: 256 entries, 15 second TTL.
const BALANCE_CACHE_CAPACITY: usize = 256;
const BALANCE_CACHE_TTL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let host = std::env::var(config::HOST_ENV).unwrap_or_else(|_| config::DEFAULT_HOST.into());
    let port = std::env::var(config::PORT_ENV)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config::DEFAULT_PORT);

    let relay_base_url = Url::parse(
        &std::env::var(config::RELAY_BASE_URL_ENV)
            .unwrap_or_else(|_| config::DEFAULT_RELAY_BASE_URL.into()),
    )?;
    let executor_base_url = Url::parse(
        &std::env::var(config::EXECUTOR_BASE_URL_ENV)
            .unwrap_or_else(|_| config::DEFAULT_EXECUTOR_BASE_URL.into()),
    )?;

    let shutdown = CancellationToken::new();

    let state = AppState::new(
        ChainRegistry::default(),
        Arc::new(RelayClient::new(relay_base_url)),
        FundsChecker::new(
            Arc::new(RpcBalanceProvider::new()),
            BalanceCache::new(BALANCE_CACHE_CAPACITY, BALANCE_CACHE_TTL),
        ),
        Arc::new(GatewayExecutor::new(executor_base_url)),
        shutdown.clone(),
    );

    let app = api::router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var(config::LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves on ctrl-c, cancelling the server-wide token first so in-flight
/// confirm flows stop navigating.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
