// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./keepsake.toml` > `~/.config/keepsake/keepsake.toml` >
//! `/etc/keepsake/keepsake.toml`, with `KEEPSAKE_` environment overrides
//! on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KeepsakeConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/keepsake/keepsake.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "keepsake.toml";

/// Top-level sections, used to split env var names into dotted keys.
const SECTIONS: [&str; 3] = ["log", "storage", "load"];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keepsake").join("keepsake.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keepsake/keepsake.toml`
/// 3. `~/.config/keepsake/keepsake.toml`
/// 4. `./keepsake.toml`
/// 5. `KEEPSAKE_*` environment variables
pub fn load_config() -> Result<KeepsakeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KeepsakeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeepsakeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeepsakeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeepsakeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KeepsakeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Env provider mapping `KEEPSAKE_STORAGE_DATABASE_PATH` to
/// `storage.database_path`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// field names keep their own underscores.
fn env_provider() -> Env {
    Env::prefixed("KEEPSAKE_").map(|key| env_key_to_path(key.as_str()).into())
}

pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(env_key_to_path("storage_database_path"), "storage.database_path");
        assert_eq!(env_key_to_path("load_move_quarantined"), "load.move_quarantined");
        assert_eq!(env_key_to_path("log_level"), "log.level");
        assert_eq!(env_key_to_path("unrelated"), "unrelated");
    }
}
