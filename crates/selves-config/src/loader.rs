// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/selves/selves.toml`, `~/.config/selves/selves.toml`,
//! `./selves.toml`, then `SELVES_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SelvesConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/selves/selves.toml";
pub(crate) const LOCAL_CONFIG: &str = "selves.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("selves/selves.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SelvesConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SelvesConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SelvesConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SelvesConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SelvesConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SelvesConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `SELVES_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `map()` rather than `split("_")` because keys themselves contain
/// underscores (`SELVES_BACKEND_HISTORY_WINDOW` is `backend.history_window`).
pub fn env_provider() -> Env {
    Env::prefixed("SELVES_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 4] = ["app", "backend", "storage", "proxy"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
