// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the chat proxy.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use selves_gateway::{ChatReply, ChatRequest, ProxyErrorBody};
use serde::Serialize;
use tracing::{debug, warn};

use crate::server::ProxyState;
use crate::upstream::{UpstreamRequest, upstream_content};

/// Message returned when the request lacks a prompt or messages.
pub const BAD_REQUEST_MESSAGE: &str = "Bad request: need systemPrompt + messages[]";

/// Message returned when the proxy has no vendor credentials.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Missing DF_PROJECT_ID or DF_API_KEY";

fn error_response(status: StatusCode, body: ProxyErrorBody) -> Response {
    (status, Json(body)).into_response()
}

/// POST /api/openai-chat
pub async fn post_chat(State(state): State<ProxyState>, body: Bytes) -> Response {
    let Some((project_id, api_key)) = state.credentials() else {
        warn!("chat proxy has no vendor credentials configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ProxyErrorBody::new(MISSING_CREDENTIALS_MESSAGE),
        );
    };

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "chat proxy received malformed JSON");
            return error_response(
                StatusCode::BAD_REQUEST,
                ProxyErrorBody::new(BAD_REQUEST_MESSAGE).with_detail(e.to_string()),
            );
        }
    };

    let system_prompt = request.system_prompt.trim();
    if system_prompt.is_empty() || request.messages.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ProxyErrorBody::new(BAD_REQUEST_MESSAGE),
        );
    }

    let model = request
        .model
        .as_deref()
        .unwrap_or(state.default_model.as_str());
    let payload = UpstreamRequest::chat(api_key, model, system_prompt, &request.messages);
    let url = format!("{}/{}", state.upstream_base_url, project_id);

    debug!(
        messages = request.messages.len(),
        model, "forwarding chat exchange upstream"
    );

    let response = match state.client.post(&url).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "upstream request could not be sent");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ProxyErrorBody::new(e.to_string()),
            );
        }
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "upstream response body could not be read");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ProxyErrorBody::new(e.to_string()),
            );
        }
    };

    if !status.is_success() {
        warn!(status = status.as_u16(), "upstream rejected the chat exchange");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ProxyErrorBody::new(format!("upstream request failed ({})", status.as_u16()))
                .with_detail(text),
        );
    }

    let content = upstream_content(&text);
    Json(ChatReply {
        content: Some(content),
    })
    .into_response()
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
}

/// GET /health
pub async fn get_health() -> impl IntoResponse {
    Json(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
