// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proxy HTTP server built on axum.

use std::future::Future;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use selves_config::model::ProxyConfig;
use selves_core::SelvesError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Route the engine posts exchanges to.
pub const CHAT_ROUTE: &str = "/api/openai-chat";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared state for the request handlers.
///
/// Holds the vendor API key; it is only ever written into upstream requests.
#[derive(Clone)]
pub struct ProxyState {
    pub client: reqwest::Client,
    pub upstream_base_url: String,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub default_model: String,
}

impl ProxyState {
    /// State from the `[proxy]` section, falling back to `DF_PROJECT_ID` and
    /// `DF_API_KEY` for unset credentials.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, SelvesError> {
        let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| SelvesError::Gateway {
                message: format!("failed to build upstream HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            upstream_base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone().or_else(|| from_env("DF_PROJECT_ID")),
            api_key: config.api_key.clone().or_else(|| from_env("DF_API_KEY")),
            default_model: config.model.clone(),
        })
    }

    /// Project id and API key, when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let project_id = self.project_id.as_deref().filter(|p| !p.trim().is_empty())?;
        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some((project_id, api_key))
    }
}

/// The proxy's routes: the chat route and `GET /health`.
pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(handlers::post_chat))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Binds `bind_address:port` and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ProxyConfig,
    state: ProxyState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), SelvesError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SelvesError::Gateway {
            message: format!("failed to bind proxy to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("chat proxy listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SelvesError::Gateway {
            message: format!("proxy server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
