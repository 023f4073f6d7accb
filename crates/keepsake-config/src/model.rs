// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Keepsake.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Keepsake configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeepsakeConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Behavior of the entity store while loading.
    #[serde(default)]
    pub load: LoadConfig,
}

impl KeepsakeConfig {
    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Storage quota reported next to usage, in bytes.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("keepsake").join("keepsake.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("keepsake.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_quota_bytes() -> u64 {
    50 * 1024 * 1024
}

/// What the store does with records it cannot use as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Move quarantined records under `quarantine/` instead of leaving
    /// them in place.
    #[serde(default)]
    pub move_quarantined: bool,

    /// Save records upgraded by the migration chain back in their new shape.
    #[serde(default)]
    pub rewrite_migrated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = KeepsakeConfig::default();
        assert_eq!(config.log.level, "info");
        assert!(config.storage.wal_mode);
        assert_eq!(config.storage.quota_bytes, 52_428_800);
        assert!(config.storage.database_path.ends_with("keepsake.db"));
        assert!(!config.load.move_quarantined);
        assert!(!config.load.rewrite_migrated);
    }

    #[test]
    fn renders_as_toml() {
        let rendered = KeepsakeConfig::default().to_toml_string().unwrap();
        assert!(rendered.contains("[storage]"));
        assert!(rendered.contains("quota_bytes = 52428800"));
    }
}
