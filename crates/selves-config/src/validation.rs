// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SelvesConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SelvesConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let endpoint = config.backend.endpoint.trim();
    if endpoint.is_empty() {
        errors.push(validation("backend.endpoint must not be empty".to_string()));
    } else if !is_http_url(endpoint) {
        errors.push(validation(format!(
            "backend.endpoint `{endpoint}` must start with http:// or https://"
        )));
    }

    if config.backend.history_window == 0 {
        errors.push(validation(
            "backend.history_window must be at least 1".to_string(),
        ));
    }

    if config.backend.timeout_secs == 0 {
        errors.push(validation(
            "backend.timeout_secs must be at least 1".to_string(),
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation(
            "storage.database_path must not be empty".to_string(),
        ));
    }

    let addr = config.proxy.bind_address.trim();
    if addr.is_empty() {
        errors.push(validation("proxy.bind_address must not be empty".to_string()));
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(validation(format!(
                "proxy.bind_address `{addr}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.proxy.port == 0 {
        errors.push(validation("proxy.port must not be 0".to_string()));
    }

    if !is_http_url(config.proxy.upstream_base_url.trim()) {
        errors.push(validation(format!(
            "proxy.upstream_base_url `{}` must start with http:// or https://",
            config.proxy.upstream_base_url
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
