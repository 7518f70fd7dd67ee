// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `selves proxy` command implementation.

use selves_config::model::SelvesConfig;
use selves_core::SelvesError;
use selves_proxy::{ProxyState, start_server};
use tracing::{info, warn};

/// Runs the chat proxy until Ctrl+C.
pub async fn run_proxy(config: &SelvesConfig) -> Result<(), SelvesError> {
    let state = ProxyState::from_config(&config.proxy)?;
    if state.credentials().is_none() {
        warn!("no vendor project id or API key configured, chat requests will fail");
    }

    start_server(&config.proxy, state, shutdown_signal()).await?;

    info!("chat proxy shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
