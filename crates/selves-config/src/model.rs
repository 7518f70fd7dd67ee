// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos in config keys
//! are reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Selves configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SelvesConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// How the engine reaches the chat proxy.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Local transcript storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// The bundled chat proxy server.
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in the shell banner.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "selves".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Backend gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Full URL of the chat proxy route.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds for one exchange.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Most recent history messages sent with each exchange.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Model identifier forwarded to the proxy. `None` lets the proxy decide.
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            history_window: default_history_window(),
            model: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/openai-chat".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_history_window() -> usize {
    12
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("selves").join("selves.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("selves.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Chat proxy server configuration.
///
/// The proxy holds the vendor credentials; the engine never sees them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Address to bind the proxy to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to bind the proxy to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Vendor endpoint base; the project id is appended as a path segment.
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// Vendor project identifier. Falls back to `DF_PROJECT_ID`.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Vendor API token. Falls back to `DF_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model sent upstream when the request names none. Empty is valid.
    #[serde(default)]
    pub model: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            upstream_base_url: default_upstream_base_url(),
            project_id: None,
            api_key: None,
            model: String::new(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_base_url() -> String {
    "https://data.id.tue.nl/api/vendor/localai".to_string()
}
