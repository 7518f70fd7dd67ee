// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat proxy for Selves.
//!
//! Accepts `{systemPrompt, messages, model?}` on `POST /api/openai-chat`,
//! adds the vendor project id and API token, and relays the exchange to the
//! LocalAI endpoint. Replies come back as `{content}`; failures as
//! `{error, detail?}` with a non-2xx status.

pub mod handlers;
pub mod server;
pub mod upstream;

pub use handlers::{BAD_REQUEST_MESSAGE, MISSING_CREDENTIALS_MESSAGE};
pub use server::{CHAT_ROUTE, ProxyState, build_router, start_server};
pub use upstream::UpstreamRequest;
